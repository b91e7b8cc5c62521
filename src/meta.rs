use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use serde::Serialize;

/// Static description of the crate: title, version, license, and a
/// copyright line stamped with the calendar year at first access.
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
    pub title: &'static str,
    pub version: &'static str,
    pub license: &'static str,
    pub copyright: String,
}

static PACKAGE_INFO: Lazy<PackageInfo> = Lazy::new(|| PackageInfo {
    title: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
    license: env!("CARGO_PKG_LICENSE"),
    copyright: format!(
        "Copyright {} the Veld project developers",
        Local::now().year()
    ),
});

/// Process-wide package metadata.
///
/// Built once on first access and never mutated afterwards. The host clock
/// is read exactly once, to stamp the copyright year; repeated calls return
/// the same record.
pub fn package_info() -> &'static PackageInfo {
    &PACKAGE_INFO
}
