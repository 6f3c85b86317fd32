//! Comment command handlers.

use tabled::Tabled;

use scribly_api::{Comment, CommentDraft, CommentQuery, PageQuery};

use crate::cli::{CommentsArgs, CommentsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::posts::page_footer;
use super::{Context, util};

#[derive(Tabled)]
struct CommentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Post")]
    post: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Comment")]
    content: String,
    #[tabled(rename = "Likes")]
    likes: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl CommentRow {
    fn new(c: &Comment, depth: usize) -> Self {
        let indent = "  ".repeat(depth);
        let marker = if depth > 0 { "↳ " } else { "" };
        Self {
            id: c.id,
            post: or_dash(c.post_id),
            author: or_dash(c.nickname.as_deref().or(c.username.as_deref())),
            content: format!("{indent}{marker}{}", util::ellipsize(&c.content, 60)),
            likes: or_dash(c.like_count),
            created: or_dash(c.created_at.as_deref()),
        }
    }
}

/// Depth-first walk of a comment tree into indented rows.
fn flatten_tree(comments: &[Comment], depth: usize, rows: &mut Vec<CommentRow>) {
    for comment in comments {
        rows.push(CommentRow::new(comment, depth));
        flatten_tree(&comment.children, depth + 1, rows);
    }
}

pub async fn handle(
    ctx: &Context,
    args: CommentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = ctx.session.api();

    match args.command {
        CommentsCommand::List {
            post_id,
            page,
            sort,
        } => {
            let query = CommentQuery {
                page_num: Some(page.page),
                page_size: Some(page.size),
                sort_by: sort.sort_by,
                sort_order: sort.sort_order,
            };
            let result = api.list_post_comments(post_id, &query).await?;
            let out = output::render_list(
                global.output,
                &result.records,
                |c| CommentRow::new(c, 0),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            page_footer(&result, global);
            Ok(())
        }

        CommentsCommand::Tree { post_id } => {
            let tree = api.comment_tree(post_id).await?;
            let out = match global.output {
                crate::cli::OutputFormat::Table => {
                    let mut rows = Vec::new();
                    flatten_tree(&tree, 0, &mut rows);
                    tabled::Table::new(rows)
                        .with(tabled::settings::Style::rounded())
                        .to_string()
                }
                format => output::render_list(
                    format,
                    &tree,
                    |c| CommentRow::new(c, 0),
                    |c| c.id.to_string(),
                )?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CommentsCommand::Add {
            post_id,
            content,
            parent,
            reply_to,
        } => {
            let draft = CommentDraft {
                post_id,
                content,
                parent_id: parent,
                reply_to_user_id: reply_to,
            };
            let created = api.create_comment(&draft).await?;
            ctx.done("Comment posted");
            output::print_output(&util::created_id(&created), global.quiet);
            Ok(())
        }

        CommentsCommand::Update { id, content } => {
            api.update_comment(id, &content).await?;
            ctx.done("Comment updated");
            Ok(())
        }

        CommentsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete comment {id}?"), global.yes)? {
                return Ok(());
            }
            api.delete_comment(id).await?;
            ctx.done("Comment deleted");
            Ok(())
        }

        CommentsCommand::Mine { page } => {
            let query = PageQuery {
                page_num: Some(page.page),
                page_size: Some(page.size),
            };
            let result = api.my_comments(&query).await?;
            let out = output::render_list(
                global.output,
                &result.records,
                |c| CommentRow::new(c, 0),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            page_footer(&result, global);
            Ok(())
        }

        CommentsCommand::Count { post_id } => {
            let count = api.comment_count(post_id).await?;
            output::print_output(&count.to_string(), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tree_rows_are_indented_by_depth() {
        let tree: Vec<Comment> = serde_json::from_value(json!([
            {"id": 1, "content": "root", "children": [
                {"id": 2, "content": "reply", "children": [
                    {"id": 3, "content": "nested"}
                ]}
            ]},
            {"id": 4, "content": "second"}
        ]))
        .unwrap();

        let mut rows = Vec::new();
        flatten_tree(&tree, 0, &mut rows);

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(rows[0].content, "root");
        assert_eq!(rows[1].content, "  ↳ reply");
        assert_eq!(rows[2].content, "    ↳ nested");
    }
}
