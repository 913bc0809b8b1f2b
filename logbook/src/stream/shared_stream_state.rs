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

use std::{sync::{Arc, MutexGuard, PoisonError},
          time::Instant};

use crate::{PrefixMode, StdMutex, StreamModes, StreamState, Style, Tag};

/// Cheap to clone handle to a [`StreamState`]. Clones share the same state, so this is
/// what the out and err streams of a logger (and a shared sub logger) hold.
///
/// The lock is taken for one mutation (plus the write that depends on it) at a time.
/// The scoped `do_with_*` methods release it while the body runs, so a body can log
/// through the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedStreamState {
    inner: Arc<StdMutex<StreamState>>,
}

mod constructors {
    use super::*;

    impl From<StreamState> for SharedStreamState {
        fn from(state: StreamState) -> Self {
            Self {
                inner: Arc::new(StdMutex::new(state)),
            }
        }
    }

    impl SharedStreamState {
        #[must_use]
        pub fn new(width: usize, modes: StreamModes) -> Self {
            StreamState::new(width, modes).into()
        }

        /// New independent state, see [`StreamState::sub_state`].
        #[must_use]
        pub fn sub_state(&self) -> Self { self.lock().sub_state().into() }

        /// New independent state, see [`StreamState::copied_state`].
        #[must_use]
        pub fn copied_state(&self) -> Self { self.lock().copied_state().into() }

        /// `true` if both handles point to the same state.
        #[must_use]
        pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.inner, &other.inner) }
    }
}

mod locking {
    use super::*;

    impl SharedStreamState {
        /// A caller that panicked while holding the lock leaves the state as it was at
        /// that point, which is still renderable.
        pub fn lock(&self) -> MutexGuard<'_, StreamState> {
            self.inner.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub(super) fn update(&self, f: impl FnOnce(&mut StreamState)) { f(&mut *self.lock()); }

        pub(super) fn read<T>(&self, f: impl FnOnce(&StreamState) -> T) -> T { f(&*self.lock()) }

        /// Sets a value, runs `body` without holding the lock, then puts the old value
        /// back.
        pub(super) fn scoped<V, R>(
            &self,
            swap: impl Fn(&mut StreamState, V) -> V,
            value: V,
            body: impl FnOnce() -> R,
        ) -> R {
            let saved = swap(&mut *self.lock(), value);
            let result = body();
            swap(&mut *self.lock(), saved);
            result
        }
    }
}

mod modes {
    use super::*;

    impl SharedStreamState {
        #[must_use]
        pub fn modes(&self) -> StreamModes { self.read(|it| it.modes) }

        pub fn mute(&self) { self.update(|it| it.modes.is_muted = true); }

        pub fn unmute(&self) { self.update(|it| it.modes.is_muted = false); }

        #[must_use]
        pub fn is_muted(&self) -> bool { self.read(|it| it.modes.is_muted) }

        pub fn enable_style(&self) { self.update(|it| it.modes.is_style_enabled = true); }

        pub fn disable_style(&self) { self.update(|it| it.modes.is_style_enabled = false); }

        #[must_use]
        pub fn is_style_enabled(&self) -> bool { self.read(|it| it.modes.is_style_enabled) }

        pub fn enable_line_wrapping(&self) {
            self.update(|it| it.modes.is_line_wrapping_enabled = true);
        }

        pub fn disable_line_wrapping(&self) {
            self.update(|it| it.modes.is_line_wrapping_enabled = false);
        }

        #[must_use]
        pub fn is_line_wrapping_enabled(&self) -> bool {
            self.read(|it| it.modes.is_line_wrapping_enabled)
        }

        pub fn enable_proxy_stream_data_formatting(&self) {
            self.update(|it| it.modes.is_proxy_stream_data_formatting_enabled = true);
        }

        pub fn disable_proxy_stream_data_formatting(&self) {
            self.update(|it| it.modes.is_proxy_stream_data_formatting_enabled = false);
        }

        #[must_use]
        pub fn is_proxy_stream_data_formatting_enabled(&self) -> bool {
            self.read(|it| it.modes.is_proxy_stream_data_formatting_enabled)
        }

        pub fn do_with_proxy_stream_data_formatting<R>(&self, body: impl FnOnce() -> R) -> R {
            self.scoped(swap_proxy_formatting, true, body)
        }

        pub fn do_without_proxy_stream_data_formatting<R>(
            &self,
            body: impl FnOnce() -> R,
        ) -> R {
            self.scoped(swap_proxy_formatting, false, body)
        }

        pub fn enable_gitlab_collapsible_sections(&self) {
            self.update(|it| it.modes.is_gitlab_collapsible_sections_enabled = true);
        }

        pub fn disable_gitlab_collapsible_sections(&self) {
            self.update(|it| it.modes.is_gitlab_collapsible_sections_enabled = false);
        }

        #[must_use]
        pub fn is_gitlab_collapsible_sections_enabled(&self) -> bool {
            self.read(|it| it.modes.is_gitlab_collapsible_sections_enabled)
        }

        pub fn enable_log_process_border(&self) {
            self.update(|it| it.modes.is_log_process_border_enabled = true);
        }

        pub fn disable_log_process_border(&self) {
            self.update(|it| it.modes.is_log_process_border_enabled = false);
        }

        #[must_use]
        pub fn is_log_process_border_enabled(&self) -> bool {
            self.read(|it| it.modes.is_log_process_border_enabled)
        }

        pub fn disable_pretty_log(&self) { self.update(|it| it.modes.disable_pretty_log()); }

        pub fn reset_modes(&self) { self.update(StreamState::reset_modes); }
    }

    fn swap_proxy_formatting(state: &mut StreamState, value: bool) -> bool {
        std::mem::replace(
            &mut state.modes.is_proxy_stream_data_formatting_enabled,
            value,
        )
    }
}

mod widths {
    use super::*;

    impl SharedStreamState {
        #[must_use]
        pub fn width(&self) -> usize { self.read(|it| it.width) }

        pub fn set_width(&self, width: usize) { self.update(|it| it.width = width); }

        #[must_use]
        pub fn content_width(&self) -> isize { self.read(StreamState::content_width) }

        #[must_use]
        pub fn service_width(&self) -> usize { self.read(StreamState::service_width) }
    }
}

mod indent {
    use super::*;

    impl SharedStreamState {
        #[must_use]
        pub fn indent_width(&self) -> usize { self.read(|it| it.indent_width) }

        pub fn increase_indent(&self) { self.update(StreamState::increase_indent); }

        pub fn decrease_indent(&self) { self.update(StreamState::decrease_indent); }

        pub fn reset_indent(&self) { self.update(StreamState::reset_indent); }

        pub fn do_with_indent<R>(&self, body: impl FnOnce() -> R) -> R {
            self.increase_indent();
            let result = body();
            self.decrease_indent();
            result
        }

        pub fn do_without_indent<R>(&self, body: impl FnOnce() -> R) -> R {
            self.scoped(
                |state, value| std::mem::replace(&mut state.indent_width, value),
                0,
                body,
            )
        }

        /// Arms the blank separator line, see [`crate::OptionalLn`].
        pub fn enable_optional_ln(&self) { self.update(|it| it.optional_ln.arm()); }

        pub fn disable_optional_ln(&self) { self.update(|it| it.optional_ln.disarm()); }
    }
}

mod tag {
    use super::*;

    impl SharedStreamState {
        #[must_use]
        pub fn tag(&self) -> Tag { self.read(|it| it.tag.clone()) }

        pub fn set_tag(&self, value: impl Into<String>) {
            let value = value.into();
            self.update(|it| it.tag.value = value);
        }

        pub fn set_tag_style(&self, style: Style) { self.update(|it| it.tag.style = style); }

        pub fn set_tag_with_style(&self, value: impl Into<String>, style: Style) {
            let tag = Tag {
                value: value.into(),
                style,
            };
            self.update(|it| it.tag = tag);
        }

        pub fn reset_tag(&self) { self.update(|it| it.tag = Tag::default()); }

        pub fn do_with_tag<R>(
            &self,
            value: impl Into<String>,
            style: Style,
            body: impl FnOnce() -> R,
        ) -> R {
            let tag = Tag {
                value: value.into(),
                style,
            };
            self.scoped(|state, tag| std::mem::replace(&mut state.tag, tag), tag, body)
        }
    }
}

mod prefix {
    use super::*;

    impl SharedStreamState {
        #[must_use]
        pub fn prefix_mode(&self) -> PrefixMode { self.read(|it| it.prefix.mode.clone()) }

        pub fn set_prefix(&self, value: impl Into<String>) {
            let mode = PrefixMode::Literal(value.into());
            self.update(|it| it.prefix.mode = mode);
        }

        pub fn set_prefix_style(&self, style: Style) {
            self.update(|it| it.prefix.style = style);
        }

        /// Drops any prefix. The style and the duration start instant are kept.
        pub fn disable_prefix(&self) { self.update(|it| it.prefix.mode = PrefixMode::None); }

        pub fn enable_prefix_duration(&self) {
            self.update(|it| it.prefix.mode = PrefixMode::DurationSinceStart);
        }

        pub fn disable_prefix_duration(&self) {
            self.disable_prefix_if(PrefixMode::DurationSinceStart);
        }

        #[must_use]
        pub fn is_prefix_duration_enabled(&self) -> bool {
            self.read(|it| it.prefix.mode == PrefixMode::DurationSinceStart)
        }

        pub fn reset_prefix_duration_start_time(&self) {
            self.update(|it| it.prefix.start = Instant::now());
        }

        pub fn enable_prefix_time(&self) {
            self.update(|it| it.prefix.mode = PrefixMode::WallClockTime);
        }

        pub fn disable_prefix_time(&self) { self.disable_prefix_if(PrefixMode::WallClockTime); }

        #[must_use]
        pub fn is_prefix_time_enabled(&self) -> bool {
            self.read(|it| it.prefix.mode == PrefixMode::WallClockTime)
        }

        /// A [`chrono::format::strftime`] format string.
        pub fn set_prefix_time_format(&self, format: impl Into<String>) {
            let format = format.into();
            self.update(|it| it.prefix.time_format = format);
        }

        fn disable_prefix_if(&self, mode: PrefixMode) {
            self.update(|it| {
                if it.prefix.mode == mode {
                    it.prefix.mode = PrefixMode::None;
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_clones_share_state() {
        let state = SharedStreamState::default();
        let clone = state.clone();
        clone.mute();
        assert!(state.is_muted());
        assert!(state.ptr_eq(&clone));
        assert!(!state.ptr_eq(&state.sub_state()));
        assert!(!state.ptr_eq(&state.copied_state()));
    }

    #[test]
    fn test_scoped_indent_releases_lock_in_body() {
        let state = SharedStreamState::default();
        let seen = state.do_with_indent(|| {
            // The lock is not held here.
            state.do_without_indent(|| state.indent_width())
                + state.indent_width() * 10
        });
        assert_eq2!(seen, 20);
        assert_eq2!(state.indent_width(), 0);
    }

    #[test]
    fn test_scoped_tag() {
        let state = SharedStreamState::default();
        state.set_tag("outer");
        let result: Result<(), &str> = state.do_with_tag("inner", Style::Bold, || {
            assert_eq2!(state.tag().value, "inner");
            Err("failed")
        });
        assert_eq2!(result, Err("failed"));
        assert_eq2!(state.tag().value, "outer");
        assert_eq2!(state.tag().style, Style::None);
    }

    #[test]
    fn test_scoped_proxy_formatting() {
        let state = SharedStreamState::default();
        state.do_without_proxy_stream_data_formatting(|| {
            assert!(!state.is_proxy_stream_data_formatting_enabled());
            state.do_with_proxy_stream_data_formatting(|| {
                assert!(state.is_proxy_stream_data_formatting_enabled());
            });
            assert!(!state.is_proxy_stream_data_formatting_enabled());
        });
        assert!(state.is_proxy_stream_data_formatting_enabled());
    }

    #[test]
    fn test_prefix_modes_are_exclusive() {
        let state = SharedStreamState::default();
        state.set_prefix("> ");
        state.enable_prefix_duration();
        assert!(state.is_prefix_duration_enabled());
        state.enable_prefix_time();
        assert!(!state.is_prefix_duration_enabled());
        assert!(state.is_prefix_time_enabled());

        // Disabling a mode that is not active changes nothing.
        state.disable_prefix_duration();
        assert!(state.is_prefix_time_enabled());
        state.disable_prefix_time();
        assert_eq2!(state.prefix_mode(), PrefixMode::None);
    }

    #[test]
    fn test_width_and_content_width() {
        let state = SharedStreamState::new(30, StreamModes::default());
        state.set_tag("ab");
        assert_eq2!(state.service_width(), 4);
        assert_eq2!(state.content_width(), 26);
        state.set_width(50);
        assert_eq2!(state.width(), 50);
    }

    #[test]
    fn test_disable_pretty_log_and_reset_modes() {
        let state = SharedStreamState::default();
        state.disable_pretty_log();
        assert!(!state.is_log_process_border_enabled());
        assert!(!state.is_line_wrapping_enabled());
        state.reset_modes();
        assert!(state.is_log_process_border_enabled());
    }
}
