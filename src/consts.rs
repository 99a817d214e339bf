/// Maximum valid BS year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (Chaitra)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for Baisakh, the first month of the BS year
pub const BAISAKH: u8 = 1;
/// Month number for Magh. Magh, Falgun and Chaitra fall in the AD year
/// after the one the BS new year started in.
pub const MAGH: u8 = 10;
/// Month number for Chaitra
pub const CHAITRA: u8 = 12;

/// Canonical month names (index 0 is Baisakh)
pub const BS_MONTH_NAMES: [&str; MAX_MONTH as usize] = [
    "Baisakh", "Jestha", "Ashadh", "Shrawan", "Bhadra", "Ashwin", "Kartik", "Mangsir", "Poush",
    "Magh", "Falgun", "Chaitra",
];

/// Days assumed for a year missing from the month table when it lies
/// between two tabulated years
pub const FALLBACK_YEAR_DAYS: i64 = 365;

/// BS year minus this is the AD year in which the BS year starts
pub const APPROX_YEAR_OFFSET: i32 = 57;
/// Months between the BS month number and the AD month number for
/// Baisakh..=Poush
pub const APPROX_MONTH_SHIFT: u8 = 3;
/// Days are clamped to this in approximate conversions so that every AD
/// month accepts them
pub const APPROX_DAY_CLAMP: u8 = 28;

/// ISO calendar date format used for AD output
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Range separator in the string form of an issue window
pub const RANGE_SEPARATOR: char = '/';
