//! Small id and time helpers shared across the crate.

pub mod time;

const ID_ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w',
    'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Generate a url-safe id for a graph invocation.
pub fn longid() -> String {
    nanoid::nanoid!(21, &ID_ALPHABET)
}

/// Generate a short id, usable as a default node id.
pub fn shortid() -> String {
    nanoid::nanoid!(8, &ID_ALPHABET)
}
