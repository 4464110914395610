mod drafts;
mod list;
mod prefs;

pub use drafts::run_drafts;
pub use list::run_list;
pub use prefs::run_prefs;
