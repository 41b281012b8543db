pub mod frame;
pub mod measurement;
pub mod zone;

pub use frame::{Frame, MEASUREMENTS_PER_FRAME};
pub use measurement::{AnglePoint, Measurement};
pub use zone::{ZoneEvent, ZoneSnapshot, ZoneState, ZoneTransition};
