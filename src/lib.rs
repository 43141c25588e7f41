pub mod error;
pub mod classify;
pub mod bounds;
pub mod stripper;
pub mod shape;
pub mod mask;
pub mod builtin_font;
pub mod button;
pub mod pipeline;

pub use error::{Result, TouchupError};
pub use classify::{PixelClass, PixelClassifier, WhitenessClassifier};
pub use bounds::{content_bounds, crop_to_opaque, opaque_bounds, BoundingBox};
pub use stripper::{strip_background, strip_white_background, StripReport, StripSettings, TextFillRegion, TextFillSettings};
pub use mask::{apply_rounded_mask, rounded_mask, MaskSettings};
pub use button::{render_button, resolve_font, ButtonFont, ButtonLayout, ButtonSettings, FontKind};
pub use pipeline::{
    create_button, load_image, load_manifest, load_settings, load_source_image, run_batch, save_png, touch_up,
    touch_up_image, BatchJob, BatchOutcome, TouchupResult, TouchupSettings,
};
