//! `flotilla make-projects` command
//!
//! Like `init`, but only for the repositories already checked out.

use anyhow::Result;

use super::Session;

pub fn execute(session: &Session) -> Result<()> {
    super::init::generate(session, false)
}
