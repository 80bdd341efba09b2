pub mod academic_year;
pub mod clock;
pub mod file_magic;
pub mod numeric;
pub mod validate;

pub use academic_year::academic_year_for;
pub use clock::{Clock, FixedClock, SystemClock};
pub use file_magic::content_matches_extension;
pub use numeric::round_half_up;
