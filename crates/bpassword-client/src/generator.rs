//! Password generation

use rand::seq::SliceRandom;
use rand::rngs::OsRng;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Default generated password length
pub const DEFAULT_LENGTH: usize = 16;

/// One character per class is guaranteed, so lengths below 4 are clamped up
const MIN_LENGTH: usize = 4;

/// Generate a random password of the given length.
///
/// Contains at least one uppercase letter, one lowercase letter, one digit,
/// and one symbol; the remainder is drawn uniformly from the union of the
/// four classes and the result is shuffled.
pub fn generate_password(length: usize) -> String {
    let length = length.max(MIN_LENGTH);
    let mut rng = OsRng;

    let mut bytes = Vec::with_capacity(length);
    for class in [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS] {
        bytes.push(*class.choose(&mut rng).expect("charset is non-empty"));
    }

    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();
    while bytes.len() < length {
        bytes.push(*all.choose(&mut rng).expect("charset is non-empty"));
    }

    bytes.shuffle(&mut rng);
    String::from_utf8(bytes).expect("charsets are ASCII")
}
