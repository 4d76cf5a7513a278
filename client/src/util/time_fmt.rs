//! Message timestamp formatting.

#[cfg(test)]
#[path = "time_fmt_test.rs"]
mod time_fmt_test;

use time::{OffsetDateTime, UtcOffset};

/// Format as 12-hour `h:MM AM/PM` in the given offset.
#[must_use]
pub fn format_clock(at: OffsetDateTime, offset: UtcOffset) -> String {
    let local = at.to_offset(offset);
    let (hour, minute) = (local.hour(), local.minute());
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02} {suffix}")
}

/// The browser's current UTC offset; UTC outside the browser.
#[must_use]
pub fn local_offset() -> UtcOffset {
    #[cfg(feature = "hydrate")]
    {
        // getTimezoneOffset is minutes *behind* UTC.
        let minutes = -js_sys::Date::new_0().get_timezone_offset();
        #[allow(clippy::cast_possible_truncation)]
        let seconds = (minutes * 60.0) as i32;
        UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        UtcOffset::UTC
    }
}

/// Format in the viewer's local time.
#[must_use]
pub fn format_local(at: OffsetDateTime) -> String {
    format_clock(at, local_offset())
}
