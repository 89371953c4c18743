// Shared prompt fragments. Feature modules keep their own prompts.rs alongside them.

/// System role for every job-board generation call.
pub const RECRUITER_SYSTEM: &str = "You are a senior technical recruiter.";
