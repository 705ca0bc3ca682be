//! Length-keyed signature descrambling.
//!
//! Scrambled signatures are permutations of the real one. Which permutation
//! applies depends only on the length of the scrambled string, so every
//! supported length maps to a fixed list of [`Step`]s whose outputs are
//! concatenated. Age-restricted videos are served by a different player and
//! use their own transform for length 86.

use crate::extractor::error::ExtractorError;
use tracing::debug;

/// One primitive of a transform. Ranges are half-open character indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Characters `start..end` in order.
    Slice(usize, usize),
    /// Characters `start..end` in reverse order.
    Reversed(usize, usize),
    /// The single character at the index.
    Char(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    pub length: usize,
    pub steps: &'static [Step],
}

impl Transform {
    /// Run the steps over `chars`. Returns `None` if a step reaches past the
    /// end of the input.
    pub fn apply(&self, chars: &[char]) -> Option<String> {
        let mut out = String::with_capacity(chars.len());
        for step in self.steps {
            match *step {
                Step::Slice(start, end) => out.extend(chars.get(start..end)?),
                Step::Reversed(start, end) => out.extend(chars.get(start..end)?.iter().rev()),
                Step::Char(index) => out.push(*chars.get(index)?),
            }
        }
        Some(out)
    }
}

use Step::{Char, Reversed, Slice};

static STANDARD: &[Transform] = &[
    Transform {
        length: 93,
        steps: &[Reversed(30, 87), Char(88), Reversed(6, 29)],
    },
    Transform {
        length: 92,
        steps: &[
            Char(25),
            Slice(3, 25),
            Char(0),
            Slice(26, 42),
            Char(79),
            Slice(43, 79),
            Char(91),
            Slice(80, 83),
        ],
    },
    Transform {
        length: 91,
        steps: &[Reversed(28, 85), Char(86), Reversed(6, 27)],
    },
    Transform {
        length: 90,
        steps: &[
            Char(25),
            Slice(3, 25),
            Char(2),
            Slice(26, 40),
            Char(77),
            Slice(41, 77),
            Char(89),
            Slice(78, 81),
        ],
    },
    Transform {
        length: 89,
        steps: &[
            Reversed(79, 85),
            Char(87),
            Reversed(61, 78),
            Char(0),
            Reversed(4, 60),
        ],
    },
    Transform {
        length: 88,
        steps: &[
            Slice(7, 28),
            Char(87),
            Slice(29, 45),
            Char(55),
            Slice(46, 55),
            Char(2),
            Slice(56, 87),
            Char(28),
        ],
    },
    Transform {
        length: 87,
        steps: &[
            Slice(6, 27),
            Char(4),
            Slice(28, 39),
            Char(27),
            Slice(40, 59),
            Char(2),
            Slice(60, 87),
        ],
    },
    Transform {
        length: 86,
        steps: &[
            Reversed(73, 81),
            Char(16),
            Reversed(40, 72),
            Char(72),
            Reversed(17, 39),
            Char(82),
            Reversed(0, 16),
        ],
    },
    Transform {
        length: 85,
        steps: &[
            Slice(3, 11),
            Char(0),
            Slice(12, 55),
            Char(84),
            Slice(56, 84),
        ],
    },
    Transform {
        length: 84,
        steps: &[
            Reversed(71, 79),
            Char(14),
            Reversed(38, 70),
            Char(70),
            Reversed(15, 37),
            Char(80),
            Reversed(0, 14),
        ],
    },
    Transform {
        length: 83,
        steps: &[Reversed(64, 81), Char(0), Reversed(1, 63), Char(63)],
    },
    Transform {
        length: 82,
        steps: &[
            Reversed(38, 81),
            Char(7),
            Reversed(8, 37),
            Char(0),
            Reversed(1, 7),
            Char(37),
        ],
    },
    Transform {
        length: 81,
        steps: &[
            Char(56),
            Reversed(57, 80),
            Char(41),
            Reversed(42, 56),
            Char(80),
            Reversed(35, 41),
            Char(0),
            Reversed(30, 34),
            Char(34),
            Reversed(10, 29),
            Char(29),
            Reversed(1, 9),
            Char(9),
        ],
    },
    Transform {
        length: 80,
        steps: &[
            Slice(1, 19),
            Char(0),
            Slice(20, 68),
            Char(19),
            Slice(69, 80),
        ],
    },
    Transform {
        length: 79,
        steps: &[
            Char(54),
            Reversed(55, 78),
            Char(39),
            Reversed(40, 54),
            Char(78),
            Reversed(35, 39),
            Char(0),
            Reversed(30, 34),
            Char(34),
            Reversed(10, 29),
            Char(29),
            Reversed(1, 9),
            Char(9),
        ],
    },
];

static AGE_RESTRICTED: &[Transform] = &[Transform {
    length: 86,
    steps: &[Slice(2, 63), Char(82), Slice(64, 82), Char(63)],
}];

/// Descrambles signatures using the static transform table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureCipher {
    age_restricted: bool,
}

impl SignatureCipher {
    pub fn new(age_restricted: bool) -> Self {
        Self { age_restricted }
    }

    pub fn is_age_restricted(&self) -> bool {
        self.age_restricted
    }

    /// The transform used for a scrambled signature of `length` characters.
    pub fn transform_for(&self, length: usize) -> Option<&'static Transform> {
        let overrides: &'static [Transform] = if self.age_restricted {
            AGE_RESTRICTED
        } else {
            &[]
        };
        overrides
            .iter()
            .chain(STANDARD)
            .find(|transform| transform.length == length)
    }

    pub fn descramble(&self, scrambled: &str) -> Result<String, ExtractorError> {
        let chars: Vec<char> = scrambled.chars().collect();
        let transform = self
            .transform_for(chars.len())
            .ok_or(ExtractorError::UnsupportedCipherLength(chars.len()))?;
        debug!(
            "Descrambling signature of length {} (age restricted: {})",
            chars.len(),
            self.age_restricted
        );
        transform
            .apply(&chars)
            .ok_or(ExtractorError::UnsupportedCipherLength(chars.len()))
    }

    /// Every length the standard table handles, ascending.
    pub fn supported_lengths() -> Vec<usize> {
        let mut lengths: Vec<usize> = STANDARD.iter().map(|t| t.length).collect();
        lengths.sort_unstable();
        lengths
    }
}
