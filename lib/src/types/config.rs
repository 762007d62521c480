use std::time::Duration;

/// How the finishing player's clock is credited when the turn switches.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IncrementPolicy {
    /// The full increment is added after every move.
    #[default]
    Fischer,
    /// The increment is added back, but never more than the time spent on the move.
    Bronstein,
}

impl IncrementPolicy {
    /// Returns the finishing player's time after the increment is applied.
    ///
    /// `remaining` is the time left when the move was completed and
    /// `turn_start` is the time the player had when the countdown segment began.
    pub fn apply(self, remaining: Duration, increment: Duration, turn_start: Duration) -> Duration {
        match self {
            IncrementPolicy::Fischer => remaining.saturating_add(increment),
            IncrementPolicy::Bronstein => remaining.saturating_add(increment).min(turn_start),
        }
    }
}

/// The time control of a single game. Fixed once the game has started.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ClockConfig {
    pub initial: Duration,
    pub increment: Duration,
    pub policy: IncrementPolicy,
}

/// The raw text of the setup form.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetupFields<'a> {
    pub hours: &'a str,
    pub minutes: &'a str,
    pub seconds: &'a str,
    pub increment_minutes: &'a str,
    pub increment_seconds: &'a str,
    pub policy: &'a str,
}

impl ClockConfig {
    pub fn new(initial_ms: u64, increment_ms: u64, policy: IncrementPolicy) -> Self {
        Self {
            initial: Duration::from_millis(initial_ms),
            increment: Duration::from_millis(increment_ms),
            policy,
        }
    }

    /// Builds a config from the setup form. Malformed numbers count as 0 and an
    /// unknown policy falls back to Fischer, so this never fails.
    pub fn from_setup(fields: &SetupFields) -> Self {
        let initial_secs = coerce_field(fields.hours)
            .saturating_mul(3600)
            .saturating_add(coerce_field(fields.minutes).saturating_mul(60))
            .saturating_add(coerce_field(fields.seconds));
        let increment_secs = coerce_field(fields.increment_minutes)
            .saturating_mul(60)
            .saturating_add(coerce_field(fields.increment_seconds));
        let policy = fields
            .policy
            .trim()
            .parse::<IncrementPolicy>()
            .unwrap_or_default();

        Self {
            initial: Duration::from_secs(initial_secs),
            increment: Duration::from_secs(increment_secs),
            policy,
        }
    }
}

/// Reads the leading integer of `field`, ignoring surrounding whitespace and
/// anything after the digits. Negative, empty or non-numeric input gives 0.
pub fn coerce_field(field: &str) -> u64 {
    let field = field.trim();
    if field.starts_with('-') {
        return 0;
    }

    field
        .strip_prefix('+')
        .unwrap_or(field)
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_malformed_fields_to_zero() {
        assert_eq!(coerce_field(""), 0);
        assert_eq!(coerce_field("abc"), 0);
        assert_eq!(coerce_field("-5"), 0);
        assert_eq!(coerce_field("  7 "), 7);
        assert_eq!(coerce_field("12abc"), 12);
        assert_eq!(coerce_field("+3"), 3);
        assert_eq!(coerce_field("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn setup_fields_are_combined() {
        let fields = SetupFields {
            hours: "1",
            minutes: "2",
            seconds: "3",
            increment_minutes: "0",
            increment_seconds: "5",
            policy: "Bronstein",
        };
        let config = ClockConfig::from_setup(&fields);

        assert_eq!(config.initial, Duration::from_secs(3723));
        assert_eq!(config.increment, Duration::from_secs(5));
        assert_eq!(config.policy, IncrementPolicy::Bronstein);
    }

    #[test]
    fn empty_setup_gives_zero_fischer_game() {
        let config = ClockConfig::from_setup(&SetupFields::default());
        assert_eq!(config, ClockConfig::new(0, 0, IncrementPolicy::Fischer));
    }

    #[test]
    fn unknown_policy_falls_back_to_fischer() {
        let fields = SetupFields {
            minutes: "5",
            policy: "hourglass",
            ..Default::default()
        };
        assert_eq!(ClockConfig::from_setup(&fields).policy, IncrementPolicy::Fischer);
    }

    #[test]
    fn fischer_is_never_capped() {
        let remaining = Duration::from_millis(9_900);
        let after = IncrementPolicy::Fischer.apply(
            remaining,
            Duration::from_secs(5),
            Duration::from_secs(10),
        );
        assert_eq!(after, Duration::from_millis(14_900));
    }

    #[test]
    fn bronstein_gives_back_at_most_time_spent() {
        let turn_start = Duration::from_secs(10);
        let increment = Duration::from_secs(2);

        // Spent 5s, only 2s comes back
        let after = IncrementPolicy::Bronstein.apply(Duration::from_secs(5), increment, turn_start);
        assert_eq!(after, Duration::from_secs(7));

        // Spent 0.5s, 0.5s comes back
        let after =
            IncrementPolicy::Bronstein.apply(Duration::from_millis(9_500), increment, turn_start);
        assert_eq!(after, turn_start);
    }

    #[test]
    fn policy_names_are_case_insensitive() {
        assert_eq!("FISCHER".parse::<IncrementPolicy>(), Ok(IncrementPolicy::Fischer));
        assert_eq!("bronstein".parse::<IncrementPolicy>(), Ok(IncrementPolicy::Bronstein));
        assert_eq!(IncrementPolicy::Bronstein.to_string(), "bronstein");
    }
}
