//! vocaplan-report — self-contained HTML exports.

pub mod html;
