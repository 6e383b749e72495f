//! Packing of a cumulative user score and an update timestamp into a single
//! integer that a sorted set can order by.
//!
//! The key is `score * 10^10 + (MAX_TIMESTAMP - timestamp)`. Ordering keys
//! descending therefore orders by score descending first, and for equal scores
//! the earliest update comes first.

use crate::error::EncodingError;

pub const SCORE_DIGITS: u32 = 6;
pub const TIMESTAMP_DIGITS: u32 = 10;
pub const KEY_DIGITS: u32 = SCORE_DIGITS + TIMESTAMP_DIGITS;

pub const MAX_USER_SCORE: i64 = 10_i64.pow(SCORE_DIGITS) - 1;
pub const MAX_TIMESTAMP: i64 = 10_i64.pow(TIMESTAMP_DIGITS) - 1;
pub const MAX_KEY: i64 = 10_i64.pow(KEY_DIGITS) - 1;

const TIMESTAMP_BASE: i64 = 10_i64.pow(TIMESTAMP_DIGITS);

/// Largest integer an IEEE-754 double holds without rounding (2^53).
pub const MAX_EXACT_STORE_VALUE: i64 = 1 << 53;

/// Highest score a Redis-backed board stores at any timestamp (900_718).
///
/// 900_719 only fits for timestamps after 1993 and anything above it never
/// does; those writes fail with [`EncodingError::NotExactlyRepresentable`].
pub const MAX_REDIS_USER_SCORE: i64 = (MAX_EXACT_STORE_VALUE - MAX_TIMESTAMP) / TIMESTAMP_BASE;

/// Packs `user_score` and `timestamp` into a composite key.
///
/// `timestamp` must be strictly below [`MAX_TIMESTAMP`]; that keeps the
/// inverted suffix at least 1 so no real key is ever the zero sentinel.
pub fn encode(user_score: i64, timestamp: i64) -> Result<i64, EncodingError> {
    if !(0..=MAX_USER_SCORE).contains(&user_score) {
        return Err(EncodingError::ScoreOutOfRange(user_score));
    }
    if !(0..MAX_TIMESTAMP).contains(&timestamp) {
        return Err(EncodingError::TimestampOutOfRange(timestamp));
    }

    Ok(user_score * TIMESTAMP_BASE + (MAX_TIMESTAMP - timestamp))
}

/// Splits a composite key back into `(user_score, timestamp)`.
///
/// A key of zero is the "no existing entry" sentinel and decodes to `(0, 0)`.
pub fn decode(key: i64) -> Result<(i64, i64), EncodingError> {
    if key == 0 {
        return Ok((0, 0));
    }
    if !(1..=MAX_KEY).contains(&key) {
        return Err(EncodingError::KeyOutOfRange(key));
    }

    let user_score = key / TIMESTAMP_BASE;
    let timestamp = MAX_TIMESTAMP - key % TIMESTAMP_BASE;

    Ok((user_score, timestamp))
}

/// Converts a key into the double a Redis sorted set stores.
pub fn key_to_store_value(key: i64) -> Result<f64, EncodingError> {
    if !(0..=MAX_EXACT_STORE_VALUE).contains(&key) {
        return Err(EncodingError::NotExactlyRepresentable(key));
    }
    Ok(key as f64)
}

/// Converts a stored double back into a key, rejecting anything that is not
/// an exact non-negative integer.
pub fn key_from_store_value(value: f64) -> Result<i64, EncodingError> {
    if !value.is_finite()
        || value.fract() != 0.0
        || value < 0.0
        || value > MAX_EXACT_STORE_VALUE as f64
    {
        return Err(EncodingError::NotAnIntegerKey(value));
    }
    Ok(value as i64)
}

/// Decodes a value read straight from the store.
pub fn decode_store_value(value: f64) -> Result<(i64, i64), EncodingError> {
    decode(key_from_store_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    const TIMESTAMPS: [i64; 3] = [1_000_000_000, T0, MAX_TIMESTAMP - 1];

    fn score_grid() -> impl Iterator<Item = i64> {
        (0..=MAX_USER_SCORE)
            .step_by(997)
            .chain([1, 2, MAX_USER_SCORE - 1, MAX_USER_SCORE])
    }

    #[test]
    fn test_decode_inverts_encode() {
        for score in score_grid() {
            for timestamp in TIMESTAMPS {
                let key = encode(score, timestamp).unwrap();
                assert_eq!(decode(key).unwrap(), (score, timestamp), "key {}", key);
            }
        }
    }

    #[test]
    fn test_decode_zero_is_sentinel() {
        assert_eq!(decode(0).unwrap(), (0, 0));
    }

    #[test]
    fn test_zero_score_never_encodes_to_sentinel() {
        let key = encode(0, T0).unwrap();
        assert!(key > 0);
        assert_eq!(decode(key).unwrap(), (0, T0));
    }

    #[test]
    fn test_higher_score_always_orders_higher() {
        let earliest = TIMESTAMPS[0];
        let latest = TIMESTAMPS[2];

        for score in score_grid().filter(|&s| s < MAX_USER_SCORE) {
            // worst case: the lower score updated first, the higher one last
            let low = encode(score, earliest).unwrap();
            let high = encode(score + 1, latest).unwrap();
            assert!(high > low, "{} vs {}", score + 1, score);
        }
    }

    #[test]
    fn test_equal_scores_earliest_update_orders_higher() {
        let earlier = encode(500, T0).unwrap();
        let later = encode(500, T0 + 1).unwrap();
        assert!(earlier > later);
    }

    #[test]
    fn test_seven_digit_score_is_rejected() {
        assert_eq!(
            encode(1_000_000, T0),
            Err(EncodingError::ScoreOutOfRange(1_000_000))
        );
    }

    #[test]
    fn test_negative_score_is_rejected() {
        assert_eq!(encode(-1, T0), Err(EncodingError::ScoreOutOfRange(-1)));
    }

    #[test]
    fn test_timestamp_outside_budget_is_rejected() {
        assert_eq!(
            encode(1, MAX_TIMESTAMP),
            Err(EncodingError::TimestampOutOfRange(MAX_TIMESTAMP))
        );
        assert_eq!(encode(1, -5), Err(EncodingError::TimestampOutOfRange(-5)));
    }

    #[test]
    fn test_decode_rejects_oversized_and_negative_keys() {
        assert_eq!(
            decode(MAX_KEY + 1),
            Err(EncodingError::KeyOutOfRange(MAX_KEY + 1))
        );
        assert_eq!(decode(-7), Err(EncodingError::KeyOutOfRange(-7)));
    }

    #[test]
    fn test_store_value_conversion() {
        let key = encode(42, T0).unwrap();
        let stored = key_to_store_value(key).unwrap();
        assert_eq!(decode_store_value(stored).unwrap(), (42, T0));
    }

    #[test]
    fn test_store_value_rejects_fractional_and_non_finite() {
        assert!(key_from_store_value(1.5).is_err());
        assert!(key_from_store_value(f64::NAN).is_err());
        assert!(key_from_store_value(f64::INFINITY).is_err());
        assert!(key_from_store_value(-3.0).is_err());
    }

    #[test]
    fn test_keys_beyond_double_precision_are_rejected() {
        let key = encode(MAX_USER_SCORE, T0).unwrap();
        assert_eq!(
            key_to_store_value(key),
            Err(EncodingError::NotExactlyRepresentable(key))
        );
    }

    #[test]
    fn test_max_redis_user_score_is_the_exact_ceiling() {
        assert_eq!(MAX_REDIS_USER_SCORE, 900_718);

        let oldest = encode(MAX_REDIS_USER_SCORE, 0).unwrap();
        assert!(key_to_store_value(oldest).is_ok());

        let over = encode(MAX_REDIS_USER_SCORE + 1, 0).unwrap();
        assert_eq!(
            key_to_store_value(over),
            Err(EncodingError::NotExactlyRepresentable(over))
        );

        let never = encode(MAX_REDIS_USER_SCORE + 2, MAX_TIMESTAMP - 1).unwrap();
        assert!(key_to_store_value(never).is_err());
    }
}
