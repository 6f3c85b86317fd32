//! Like command handlers.

use std::collections::HashMap;

use crate::cli::{GlobalOpts, LikesArgs, LikesCommand};
use crate::error::CliError;
use crate::output;

use super::Context;
use super::favorites::{flags, print_flags};

pub async fn handle(ctx: &Context, args: LikesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let api = ctx.session.api();

    match args.command {
        LikesCommand::Toggle { post_id } => {
            let result = api.toggle_post_like(post_id).await?;
            let out = output::render_single(
                global.output,
                &result,
                |v| format!("Post {post_id}: {v}"),
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LikesCommand::Check { post_ids } => {
            let found = if let [post_id] = post_ids.as_slice() {
                HashMap::from([(*post_id, api.check_post_like(*post_id).await?)])
            } else {
                api.batch_check_post_likes(&post_ids).await?
            };
            print_flags(&flags(&post_ids, &found), global)
        }

        LikesCommand::ToggleComment { comment_id } => {
            let result = api.toggle_comment_like(comment_id).await?;
            let out = output::render_single(
                global.output,
                &result,
                |v| format!("Comment {comment_id}: {v}"),
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
