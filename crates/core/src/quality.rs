//! Scene quality guessed from a release name.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Release quality, coarse scene categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    SdTv,
    SdDvd,
    HdTv,
    RawHdTv,
    FullHdTv,
    HdWebDl,
    FullHdWebDl,
    HdBluRay,
    FullHdBluRay,
    Unknown,
}

/// True when every pattern matches somewhere in `name` (case-insensitive).
fn all(name: &str, patterns: &[&str]) -> bool {
    patterns.iter().all(|p| {
        Regex::new(&format!("(?i){}", p))
            .map(|re| re.is_match(name))
            .unwrap_or(false)
    })
}

/// True when any pattern matches.
fn any(name: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| all(name, &[p]))
}

impl Quality {
    /// Classify a release name. Rules are tried in order; the first match wins.
    pub fn from_scene_name(name: &str) -> Self {
        let hd_resolution = all(name, &["(720|1080)[pi]"]);

        if all(name, &["(pdtv|hdtv|dsr|tvrip).(xvid|x264|h.?264)"])
            && !hd_resolution
            && !any(name, &["hr.ws.pdtv.x264"])
        {
            Quality::SdTv
        } else if all(name, &["web.dl|webrip", "xvid|x264|h.?264"]) && !hd_resolution {
            Quality::SdTv
        } else if any(name, &["(dvdrip|b[rd]rip)(.ws)?.(xvid|divx|x264)"]) && !hd_resolution {
            Quality::SdDvd
        } else if all(name, &["720p", "hdtv", "x264"])
            || (any(name, &["hr.ws.pdtv.x264"]) && !all(name, &["1080[pi]"]))
        {
            Quality::HdTv
        } else if all(name, &["720p|1080i", "hdtv", "mpeg-?2"])
            || all(name, &["1080[pi].hdtv", "h.?264"])
        {
            Quality::RawHdTv
        } else if all(name, &["1080p", "hdtv", "x264"]) {
            Quality::FullHdTv
        } else if all(name, &["720p", "web.dl|webrip"]) || all(name, &["720p", "itunes", "h.?264"]) {
            Quality::HdWebDl
        } else if all(name, &["1080p", "web.dl|webrip"])
            || all(name, &["1080p", "itunes", "h.?264"])
        {
            Quality::FullHdWebDl
        } else if all(name, &["720p", "bluray|hddvd|b[rd]rip", "x264"]) {
            Quality::HdBluRay
        } else if all(name, &["1080p", "bluray|hddvd|b[rd]rip", "x264"]) {
            Quality::FullHdBluRay
        } else {
            Quality::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::SdTv => "sd_tv",
            Quality::SdDvd => "sd_dvd",
            Quality::HdTv => "hd_tv",
            Quality::RawHdTv => "raw_hd_tv",
            Quality::FullHdTv => "full_hd_tv",
            Quality::HdWebDl => "hd_web_dl",
            Quality::FullHdWebDl => "full_hd_web_dl",
            Quality::HdBluRay => "hd_bluray",
            Quality::FullHdBluRay => "full_hd_bluray",
            Quality::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
