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

// Attach sources.
pub mod collapsible_sections;
pub mod optional_ln;
pub mod proxy_stream;
pub mod service_parts;
pub mod shared_stream_state;
pub mod stream_impl;
pub mod stream_modes;
pub mod stream_state;

// Re-export.
pub use collapsible_sections::*;
pub use optional_ln::*;
pub use proxy_stream::*;
pub use service_parts::*;
pub use shared_stream_state::*;
pub use stream_impl::*;
pub use stream_modes::*;
pub use stream_state::*;
