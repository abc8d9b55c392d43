//! Text shown in a preview section while its field is empty.

pub const NAME: &str = "Your Name";
pub const CONTACT: &str = "email";
pub const SUMMARY: &str = "Write a short professional summary.";
pub const EXPERIENCE: &str = "Add your work experience, one entry per line.";
pub const EDUCATION: &str = "Add your education details.";
pub const SKILLS: &str = "List your skills, separated by commas.";
pub const PROJECTS: &str = "Add your projects, one per line.";
pub const CERTIFICATES: &str = "Add your certificates, one per line.";
