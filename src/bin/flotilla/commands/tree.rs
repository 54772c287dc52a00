//! `flotilla tree` command

use anyhow::Result;

use super::Session;
use crate::cli::TreeArgs;
use flotilla::ops::{render_tree, TreeOptions};

pub fn execute(args: TreeArgs, session: &Session) -> Result<()> {
    let ctx = session.resolution_context(false)?;
    let root = ctx.root_node();

    let opts = TreeOptions {
        depth: args.depth,
        duplicates: args.duplicates,
    };
    print!("{}", render_tree(&ctx, &root, &opts));

    Ok(())
}
