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

//! GitLab CI collapsible section markers. More info:
//! <https://docs.gitlab.com/ee/ci/jobs/job_logs.html#custom-collapsible-sections>

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use slug::slugify;

/// Clears the line, so the marker itself is hidden in the job log.
pub const CLEAR_LINE: &str = "\x1b[0K";

fn since_epoch(now: SystemTime) -> Duration {
    now.duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// Unique id for one section, eg: `build-image_1700000000123456789`. Accented and
/// non latin characters are transliterated to ASCII first.
#[must_use]
pub fn section_id(message: &str, now: SystemTime) -> String {
    format!(
        "{}_{}",
        slugify(message).replace('_', "-"),
        since_epoch(now).as_nanos()
    )
}

#[must_use]
pub fn section_start_marker(id: &str, message: &str, now: SystemTime) -> String {
    format!(
        "section_start:{}:{id}\r{CLEAR_LINE}{message}\n",
        since_epoch(now).as_secs()
    )
}

#[must_use]
pub fn section_end_marker(id: &str, now: SystemTime) -> String {
    format!("section_end:{}:{id}\r{CLEAR_LINE}", since_epoch(now).as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_section_id_slug() {
        let now = UNIX_EPOCH + Duration::new(1, 0);
        assert_eq2!(section_id("Build image", now), "build-image_1000000000");
        assert_eq2!(section_id("  deploy: app_1 !! ", now), "deploy-app-1_1000000000");
        assert_eq2!(section_id("Café déjà vu", now), "cafe-deja-vu_1000000000");
    }

    #[test]
    fn test_section_id_transliterates_non_latin_text() {
        let id = section_id("日本", UNIX_EPOCH);
        let (slug, nanos) = id.rsplit_once('_').unwrap();
        assert!(!slug.is_empty());
        assert!(slug.chars().all(|it| it.is_ascii_alphanumeric() || it == '-'));
        assert_eq2!(nanos, "0");
    }

    #[test]
    fn test_markers() {
        let now = UNIX_EPOCH + Duration::new(1_700_000_000, 42);
        let id = section_id("Build image", now);
        assert_eq2!(id, "build-image_1700000000000000042");
        assert_eq2!(
            section_start_marker(&id, "Build image", now),
            "section_start:1700000000:build-image_1700000000000000042\r\x1b[0KBuild image\n"
        );
        assert_eq2!(
            section_end_marker(&id, now),
            "section_end:1700000000:build-image_1700000000000000042\r\x1b[0K"
        );
    }
}
