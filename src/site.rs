//! Site pages
//!
//! The fixed set of pages on the pharmacy website.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    About,
    Contact,
    ForProviders,
    PatientHub,
}

impl Page {
    /// All pages in navigation order
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::About,
        Page::Contact,
        Page::ForProviders,
        Page::PatientHub,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::About => "/about",
            Page::Contact => "/contact",
            Page::ForProviders => "/for-providers",
            Page::PatientHub => "/patient-hub",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About Us",
            Page::Contact => "Contact",
            Page::ForProviders => "For Providers",
            Page::PatientHub => "Patient Hub",
        }
    }

    /// Look up a page by path; a trailing slash is ignored
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|page| page.path() == normalized)
    }
}
