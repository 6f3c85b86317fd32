//! Clap derive structures for the `scribly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man page generation, so it only
//! depends on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// scribly -- command-line client for the scribly blog
#[derive(Debug, Parser)]
#[command(
    name = "scribly",
    version,
    about = "Read and write on a scribly blog from the command line",
    long_about = "A command-line client for the scribly blog API.\n\n\
        Keeps one login session per profile on disk, attaches it to every\n\
        request, and drops it as soon as the server rejects it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "SCRIBLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "SCRIBLY_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SCRIBLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SCRIBLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SCRIBLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory holding the per-profile session files
    #[arg(long, env = "SCRIBLY_STATE_DIR", global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session for this profile
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// End the session for this profile
    Logout,

    /// Show who is logged in (no network call)
    Whoami,

    /// View and edit your profile
    Profile(ProfileArgs),

    /// Check whether a username is still available
    CheckUsername {
        /// Username to check
        username: String,
    },

    /// Browse and write posts
    #[command(alias = "post")]
    Posts(PostsArgs),

    /// Read and write comments
    #[command(alias = "comment")]
    Comments(CommentsArgs),

    /// Manage favorites and favorite folders
    #[command(alias = "fav")]
    Favorites(FavoritesArgs),

    /// Like posts and comments
    #[command(alias = "like")]
    Likes(LikesArgs),

    /// Navigate to a view and print where you land
    Open {
        /// View path, e.g. "/posts/12" or "/profile"
        path: String,
    },

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's, then prompts)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// View to land on after logging in
    #[arg(long, value_name = "PATH")]
    pub redirect: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Email address
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Display name
    #[arg(long)]
    pub nickname: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the stored profile
    Show {
        /// Fetch it from the server first
        #[arg(long)]
        refresh: bool,
    },

    /// Update profile fields
    Update {
        #[arg(long)]
        nickname: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Change your password (prompts)
    Password,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POSTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Page size
    #[arg(long, default_value = "10")]
    pub size: u32,
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// Sort field
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction ("asc" or "desc")
    #[arg(long)]
    pub sort_order: Option<String>,
}

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// List posts
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only posts with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one post
    Get {
        /// Post ID
        id: i64,
    },

    /// Write a new post
    Create(PostFields),

    /// Edit a post
    Update {
        /// Post ID
        id: i64,

        #[command(flatten)]
        fields: PostFields,
    },

    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Post ID
        id: i64,
    },

    /// Publish a draft
    Publish {
        /// Post ID
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct PostFields {
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Post body
    #[arg(long, short = 'c', conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the post body from a file
    #[arg(long, short = 'f', value_name = "PATH")]
    pub content_file: Option<PathBuf>,

    #[arg(long)]
    pub summary: Option<String>,

    /// Cover image URL
    #[arg(long)]
    pub cover: Option<String>,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Post status, e.g. "draft" or "published"
    #[arg(long)]
    pub status: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub command: CommentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CommentsCommand {
    /// List comments on a post
    #[command(alias = "ls")]
    List {
        /// Post ID
        post_id: i64,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        sort: SortArgs,
    },

    /// Show the threaded comments of a post
    Tree {
        /// Post ID
        post_id: i64,
    },

    /// Comment on a post
    Add {
        /// Post ID
        post_id: i64,

        /// Comment text
        content: String,

        /// Reply to this comment
        #[arg(long)]
        parent: Option<i64>,

        /// User being replied to
        #[arg(long)]
        reply_to: Option<i64>,
    },

    /// Edit a comment
    Update {
        /// Comment ID
        id: i64,

        /// New text
        content: String,
    },

    /// Delete a comment
    #[command(alias = "rm")]
    Delete {
        /// Comment ID
        id: i64,
    },

    /// List your own comments
    Mine {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Count the comments on a post
    Count {
        /// Post ID
        post_id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FAVORITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: FavoritesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// Favorite a post
    Add {
        /// Post ID
        post_id: i64,

        /// Folder to file it under
        #[arg(long)]
        folder: Option<i64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a post from your favorites
    #[command(alias = "rm")]
    Remove {
        /// Post ID
        post_id: i64,
    },

    /// Favorite or unfavorite a post
    Toggle {
        /// Post ID
        post_id: i64,

        #[arg(long)]
        folder: Option<i64>,
    },

    /// Check which posts you have favorited
    Check {
        /// Post IDs
        #[arg(required = true)]
        post_ids: Vec<i64>,
    },

    /// List your favorites
    #[command(alias = "ls")]
    List {
        /// Only this folder
        #[arg(long)]
        folder: Option<i64>,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        sort: SortArgs,
    },

    /// Move favorites to another folder
    Move {
        /// Favorite IDs
        #[arg(required = true)]
        ids: Vec<i64>,

        /// Target folder ID
        #[arg(long)]
        to: i64,
    },

    /// Manage favorite folders
    Folders(FoldersArgs),
}

#[derive(Debug, Args)]
pub struct FoldersArgs {
    #[command(subcommand)]
    pub command: FoldersCommand,
}

#[derive(Debug, Subcommand)]
pub enum FoldersCommand {
    /// List your folders
    #[command(alias = "ls")]
    List,

    /// Create a folder
    Create {
        name: String,

        #[command(flatten)]
        fields: FolderFields,
    },

    /// Edit a folder
    Update {
        /// Folder ID
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: FolderFields,
    },

    /// Delete a folder
    #[command(alias = "rm")]
    Delete {
        /// Folder ID
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct FolderFields {
    #[arg(long)]
    pub description: Option<String>,

    /// Make the folder visible to others
    #[arg(long, action = clap::ArgAction::Set)]
    pub public: Option<bool>,

    #[arg(long)]
    pub sort_order: Option<i32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LIKES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LikesArgs {
    #[command(subcommand)]
    pub command: LikesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LikesCommand {
    /// Like or unlike a post
    Toggle {
        /// Post ID
        post_id: i64,
    },

    /// Check which posts you have liked
    Check {
        /// Post IDs
        #[arg(required = true)]
        post_ids: Vec<i64>,
    },

    /// Like or unlike a comment
    ToggleComment {
        /// Comment ID
        comment_id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file and session file locations
    Path,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "profiles.home.server")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
