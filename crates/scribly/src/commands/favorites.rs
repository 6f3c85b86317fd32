//! Favorite and favorite-folder command handlers.

use std::collections::HashMap;

use serde::Serialize;
use tabled::Tabled;

use scribly_api::{
    BatchMove, Favorite, FavoriteFolder, FavoriteQuery, FavoriteRequest, FolderDraft,
};

use crate::cli::{
    FavoritesArgs, FavoritesCommand, FolderFields, FoldersArgs, FoldersCommand, GlobalOpts,
};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::posts::page_footer;
use super::{Context, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct FavoriteRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Post")]
    post: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Folder")]
    folder: String,
    #[tabled(rename = "Notes")]
    notes: String,
    #[tabled(rename = "Saved")]
    created: String,
}

impl From<&Favorite> for FavoriteRow {
    fn from(f: &Favorite) -> Self {
        Self {
            id: f.id,
            post: or_dash(f.post_id),
            title: f
                .post_title
                .as_deref()
                .map_or_else(|| "-".into(), |t| util::ellipsize(t, 40)),
            folder: or_dash(f.folder_id),
            notes: or_dash(f.notes.as_deref()),
            created: or_dash(f.created_at.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Public")]
    public: String,
    #[tabled(rename = "Favorites")]
    count: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&FavoriteFolder> for FolderRow {
    fn from(f: &FavoriteFolder) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            public: f
                .is_public
                .map_or_else(|| "-".into(), |p| if p { "yes" } else { "no" }.into()),
            count: or_dash(f.favorite_count),
            description: or_dash(f.description.as_deref()),
        }
    }
}

/// Per-post flag, shared with the likes check.
#[derive(Serialize, Tabled)]
pub struct PostFlag {
    #[tabled(rename = "Post")]
    pub post_id: i64,
    #[tabled(rename = "Set")]
    pub set: bool,
}

/// Ordered rows from a batch-check map; ids the server left out count as
/// unset.
pub fn flags(post_ids: &[i64], found: &HashMap<i64, bool>) -> Vec<PostFlag> {
    post_ids
        .iter()
        .map(|&post_id| PostFlag {
            post_id,
            set: found.get(&post_id).copied().unwrap_or(false),
        })
        .collect()
}

pub fn print_flags(flags: &[PostFlag], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        global.output,
        flags,
        |f| PostFlag {
            post_id: f.post_id,
            set: f.set,
        },
        |f| format!("{}\t{}", f.post_id, f.set),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn folder_draft(name: Option<String>, fields: FolderFields) -> FolderDraft {
    FolderDraft {
        name,
        description: fields.description,
        is_public: fields.public,
        sort_order: fields.sort_order,
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: FavoritesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = ctx.session.api();

    match args.command {
        FavoritesCommand::Add {
            post_id,
            folder,
            notes,
        } => {
            api.favorite_post(&FavoriteRequest {
                post_id,
                folder_id: folder,
                notes,
            })
            .await?;
            ctx.done("Added to favorites");
            Ok(())
        }

        FavoritesCommand::Remove { post_id } => {
            api.unfavorite_post(post_id).await?;
            ctx.done("Removed from favorites");
            Ok(())
        }

        FavoritesCommand::Toggle { post_id, folder } => {
            let result = api.toggle_favorite(post_id, folder).await?;
            let out = output::render_single(
                global.output,
                &result,
                |v| format!("Post {post_id}: {v}"),
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FavoritesCommand::Check { post_ids } => {
            let found = if let [post_id] = post_ids.as_slice() {
                HashMap::from([(*post_id, api.check_favorite(*post_id).await?)])
            } else {
                api.batch_check_favorites(&post_ids).await?
            };
            print_flags(&flags(&post_ids, &found), global)
        }

        FavoritesCommand::List { folder, page, sort } => {
            let query = FavoriteQuery {
                folder_id: folder,
                page_num: Some(page.page),
                page_size: Some(page.size),
                sort_by: sort.sort_by,
                sort_order: sort.sort_order,
            };
            let result = api.my_favorites(&query).await?;
            let out = output::render_list(
                global.output,
                &result.records,
                |f| FavoriteRow::from(f),
                |f| f.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            page_footer(&result, global);
            Ok(())
        }

        FavoritesCommand::Move { ids, to } => {
            let count = ids.len();
            api.batch_move_favorites(&BatchMove {
                favorite_ids: ids,
                target_folder_id: to,
            })
            .await?;
            ctx.done(format!("Moved {count} favorite(s) to folder {to}"));
            Ok(())
        }

        FavoritesCommand::Folders(args) => folders(ctx, args, global).await,
    }
}

async fn folders(ctx: &Context, args: FoldersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let api = ctx.session.api();

    match args.command {
        FoldersCommand::List => {
            let folders = api.my_folders().await?;
            let out = output::render_list(
                global.output,
                &folders,
                |f| FolderRow::from(f),
                |f| f.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FoldersCommand::Create { name, fields } => {
            let created = api.create_folder(&folder_draft(Some(name), fields)).await?;
            ctx.done("Folder created");
            output::print_output(&util::created_id(&created), global.quiet);
            Ok(())
        }

        FoldersCommand::Update { id, name, fields } => {
            let draft = folder_draft(name, fields);
            if draft == FolderDraft::default() {
                return Err(CliError::Validation {
                    field: "folder".into(),
                    reason: "nothing to update".into(),
                });
            }
            api.update_folder(id, &draft).await?;
            ctx.done("Folder updated");
            Ok(())
        }

        FoldersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete folder {id}?"), global.yes)? {
                return Ok(());
            }
            api.delete_folder(id).await?;
            ctx.done("Folder deleted");
            Ok(())
        }
    }
}
