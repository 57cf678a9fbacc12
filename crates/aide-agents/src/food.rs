//! Meal-photo analysis agent.

use aide_core::assets::UploadedAsset;
use aide_core::provider::GenerativeProvider;
use aide_core::validate::{validate_asset, validate_text, IMAGE_TYPES, MAX_IMAGE_BYTES, MAX_PROMPT_CHARS};

use crate::error::AgentError;
use crate::event::AgentEvent;

/// Model the food analyzer runs on by default.
pub const VISION_MODEL: &str = "gemini-1.5-flash-8b";

/// Prompt the analysis runs with unless the caller supplies their own.
pub const NUTRITIONIST_PROMPT: &str = "\
You are an expert nutritionist and food analyst. Carefully examine the food image and provide:
1. Detailed list of food items identified
2. Calories for each item
3. Nutritional breakdown (protein, carbs, fats)
4. Estimated total calorie count
5. Brief health insights or recommendations

Format your response clearly with headings and bullet points.";

/// Analyzes one meal photo. The image is transient; nothing is recorded in
/// any conversation log.
pub async fn run_food_analysis<F>(
    provider: &dyn GenerativeProvider,
    asset: &UploadedAsset,
    prompt_override: Option<&str>,
    on_event: &mut F,
) -> Result<String, AgentError>
where
    F: FnMut(AgentEvent),
{
    on_event(AgentEvent::Validating);
    validate_asset(asset, MAX_IMAGE_BYTES, IMAGE_TYPES)?;
    let prompt = match prompt_override {
        Some(custom) => validate_text(custom, MAX_PROMPT_CHARS)?,
        None => NUTRITIONIST_PROMPT.to_string(),
    };

    on_event(AgentEvent::Dispatching);
    let analysis = provider.generate_with_image(asset, &prompt).await?;
    on_event(AgentEvent::Completed);
    Ok(analysis)
}
