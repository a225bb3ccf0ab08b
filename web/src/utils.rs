use chrono::{DateTime, Utc};

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Wall clock from the JS environment; chrono's own clock is unavailable on
/// wasm targets.
pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap()
}

pub(crate) fn format_elapsed(secs: u32) -> String {
    format!("{}s", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_rendered_in_whole_seconds() {
        assert_eq!(format_elapsed(0), "0s");
        assert_eq!(format_elapsed(61), "61s");
    }
}
