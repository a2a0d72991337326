//! Join code generation for lobbies.
//!
//! Lobby identifiers are 9-character opaque codes using Crockford's Base32
//! alphabet, which avoids the easily-confused I, L, O, and U.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

/// Length of a lobby code on the wire.
pub const CODE_LEN: usize = 9;

/// Generate a lobby join code.
pub fn generate_join_code() -> String {
    let mut rng = rand::rng();
    let mut s = String::with_capacity(CODE_LEN);
    for _ in 0..CODE_LEN {
        let idx = rng.random_range(0..CROCKFORD.len());
        s.push(CROCKFORD[idx] as char);
    }
    s
}

/// Shape check for client-supplied codes, applied before any lookup.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| CROCKFORD.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_join_code_has_correct_length() {
        let code = generate_join_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(is_valid_code(&code));
    }

    #[test]
    fn test_generate_join_code_produces_different_results() {
        let code1 = generate_join_code();
        let code2 = generate_join_code();
        assert_ne!(code1, code2);
    }

    #[test]
    fn test_is_valid_code_rejects_bad_shapes() {
        assert!(!is_valid_code("SHORT"));
        assert!(!is_valid_code("ILOVEYOUU")); // I, L, O, U are out of alphabet
        assert!(!is_valid_code("ABCDEFGH12")); // too long
    }
}
