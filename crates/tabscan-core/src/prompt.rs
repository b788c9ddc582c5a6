//! The fixed extraction prompt sent with every tablet image.

/// Instruction paired with exactly one image payload per call. Asks for four
/// labeled fields and a fixed fallback sentence for non-tablet images. Not
/// parameterized per request.
pub const TABLET_PROMPT: &str = "\
Analyze the provided image of a tablet. Extract and present the following \
information in a clear and concise format:

**Tablet Name:**
**Purpose:**
**When to Take:** (Morning, Afternoon, Night)
**Before/After Meal:** (Before Meal, After Meal, N/A)

If the image is not related to a tablet, simply state \"Image not related to a tablet.\"";

/// The sentence the model is instructed to return for non-tablet images.
pub const NOT_A_TABLET: &str = "Image not related to a tablet.";
