//! Post command handlers.

use tabled::Tabled;

use scribly_api::{Page, Post, PostDraft, PostQuery};

use crate::cli::{GlobalOpts, PostFields, PostsArgs, PostsCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::{Context, util};

const EDITOR_PATH: &str = "/editor";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Views")]
    views: String,
    #[tabled(rename = "Likes")]
    likes: String,
    #[tabled(rename = "Comments")]
    comments: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Post> for PostRow {
    fn from(p: &Post) -> Self {
        Self {
            id: p.id,
            title: util::ellipsize(&p.title, 40),
            author: or_dash(p.author_name.as_deref()),
            status: status_text(p),
            views: or_dash(p.view_count),
            likes: or_dash(p.like_count),
            comments: or_dash(p.comment_count),
            created: or_dash(p.created_at.as_deref()),
        }
    }
}

fn status_text(post: &Post) -> String {
    match &post.status {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => "-".into(),
        Some(other) => other.to_string(),
    }
}

fn detail(p: &Post) -> String {
    let header = output::detail_lines(&[
        ("ID", Some(p.id.to_string())),
        ("Title", Some(p.title.clone())),
        ("Author", p.author_name.clone()),
        ("Status", Some(status_text(p))),
        ("Summary", p.summary.clone()),
        ("Views", p.view_count.map(|n| n.to_string())),
        ("Likes", p.like_count.map(|n| n.to_string())),
        ("Comments", p.comment_count.map(|n| n.to_string())),
        ("Favorites", p.favorite_count.map(|n| n.to_string())),
        ("Created", p.created_at.clone()),
        ("Updated", p.updated_at.clone()),
    ]);
    match p.content.as_deref().filter(|c| !c.is_empty()) {
        Some(content) => format!("{header}\n\n{content}"),
        None => header,
    }
}

/// Page position footer for table output, printed to stderr.
pub fn page_footer<T>(page: &Page<T>, global: &GlobalOpts) {
    if global.quiet || !matches!(global.output, crate::cli::OutputFormat::Table) {
        return;
    }
    eprintln!(
        "Page {} of {} ({} total)",
        page.current.max(1),
        page.pages.max(1),
        page.total
    );
}

fn draft_from(fields: PostFields) -> Result<PostDraft, CliError> {
    let content = match fields.content_file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => fields.content,
    };
    Ok(PostDraft {
        title: fields.title,
        content,
        summary: fields.summary,
        cover_image: fields.cover,
        tags: fields.tags,
        status: fields.status,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: PostsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let api = ctx.session.api();

    match args.command {
        PostsCommand::List { page, status } => {
            let query = PostQuery {
                page: Some(page.page),
                size: Some(page.size),
                status,
            };
            let result = api.list_posts(&query).await?;
            let out = output::render_list(
                global.output,
                &result.records,
                |p| PostRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            page_footer(&result, global);
            Ok(())
        }

        PostsCommand::Get { id } => {
            let post = api.get_post(id).await?;
            let out = output::render_single(global.output, &post, detail, |p| p.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PostsCommand::Create(fields) => {
            util::enter(ctx, EDITOR_PATH)?;
            let draft = draft_from(fields)?;
            if draft.title.is_none() || draft.content.is_none() {
                return Err(CliError::Validation {
                    field: "post".into(),
                    reason: "a new post needs --title and --content (or --content-file)".into(),
                });
            }
            let created = api.create_post(&draft).await?;
            ctx.done("Post created");
            output::print_output(&util::created_id(&created), global.quiet);
            Ok(())
        }

        PostsCommand::Update { id, fields } => {
            util::enter(ctx, &format!("{EDITOR_PATH}/{id}"))?;
            let draft = draft_from(fields)?;
            if draft == PostDraft::default() {
                return Err(CliError::Validation {
                    field: "post".into(),
                    reason: "nothing to update".into(),
                });
            }
            api.update_post(id, &draft).await?;
            ctx.done("Post updated");
            Ok(())
        }

        PostsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete post {id}?"), global.yes)? {
                return Ok(());
            }
            api.delete_post(id).await?;
            ctx.done("Post deleted");
            Ok(())
        }

        PostsCommand::Publish { id } => {
            api.publish_post(id).await?;
            ctx.done("Post published");
            Ok(())
        }
    }
}
