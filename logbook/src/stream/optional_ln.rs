/*
 *   Copyright (c) 2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

/// A deferred blank separator line (service part only), rendered lazily before the next
/// content if anything is logged after it was armed.
///
/// Transitions:
/// - [`Self::arm`]: a block or process just ended.
/// - [`Self::disarm`]: an indent change, an explicit disable, or the start of a footer.
/// - [`Self::consume`]: content is about to be written and the line must be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptionalLn {
    #[default]
    Idle,
    Armed,
    Consumed,
}

impl OptionalLn {
    pub fn arm(&mut self) { *self = OptionalLn::Armed; }

    pub fn disarm(&mut self) { *self = OptionalLn::Idle; }

    /// Returns `true` exactly once after [`Self::arm`].
    pub fn consume(&mut self) -> bool {
        match self {
            OptionalLn::Armed => {
                *self = OptionalLn::Consumed;
                true
            }
            OptionalLn::Idle | OptionalLn::Consumed => false,
        }
    }

    #[must_use]
    pub fn is_armed(self) -> bool { self == OptionalLn::Armed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_transitions() {
        let mut optional_ln = OptionalLn::default();
        assert!(!optional_ln.consume());

        optional_ln.arm();
        assert!(optional_ln.is_armed());
        assert!(optional_ln.consume());
        assert_eq2!(optional_ln, OptionalLn::Consumed);
        assert!(!optional_ln.consume());

        optional_ln.arm();
        optional_ln.disarm();
        assert_eq2!(optional_ln, OptionalLn::Idle);
        assert!(!optional_ln.consume());
    }
}
