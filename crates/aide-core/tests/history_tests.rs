use aide_core::history::{ConversationEntry, ConversationLog, Role, MAX_HISTORY_LENGTH};

#[test]
fn test_append_preserves_insertion_order() {
    let mut log = ConversationLog::new();
    log.append(ConversationEntry::user("first"));
    log.append(ConversationEntry::assistant("second"));
    log.append(ConversationEntry::user("third"));

    let entries = log.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].content, "first");
    assert_eq!(entries[0].role, Role::User);
    assert_eq!(entries[1].content, "second");
    assert_eq!(entries[1].role, Role::Assistant);
    assert_eq!(entries[2].content, "third");
}

#[test]
fn test_length_is_min_of_appends_and_capacity() {
    for n in [0usize, 1, 19, 20, 21, 50] {
        let mut log = ConversationLog::new();
        for i in 0..n {
            log.append(ConversationEntry::user(format!("msg {}", i)));
        }
        assert_eq!(log.len(), n.min(MAX_HISTORY_LENGTH), "after {} appends", n);
    }
}

#[test]
fn test_overflow_keeps_the_newest_entries_in_order() {
    let mut log = ConversationLog::new();
    for i in 0..35 {
        log.append(ConversationEntry::user(format!("msg {}", i)));
    }

    let entries = log.entries();
    assert_eq!(entries.len(), MAX_HISTORY_LENGTH);
    // Survivors are exactly the last 20 appended, oldest first.
    for (offset, entry) in entries.iter().enumerate() {
        assert_eq!(entry.content, format!("msg {}", 15 + offset));
    }
}

#[test]
fn test_custom_capacity_is_honored() {
    let mut log = ConversationLog::with_capacity(3);
    for i in 0..10 {
        log.append(ConversationEntry::assistant(format!("reply {}", i)));
    }
    assert_eq!(log.len(), 3);
    assert_eq!(log.entries()[0].content, "reply 7");
    assert_eq!(log.entries()[2].content, "reply 9");
}

#[test]
fn test_reset_empties_the_log_and_is_idempotent() {
    let mut log = ConversationLog::new();
    for i in 0..25 {
        log.append(ConversationEntry::user(format!("msg {}", i)));
    }

    log.reset();
    assert!(log.is_empty());
    assert!(log.entries().is_empty());

    log.reset();
    assert!(log.entries().is_empty());

    // The log is still usable after a reset.
    log.append(ConversationEntry::user("fresh start"));
    assert_eq!(log.len(), 1);
}
