//! Command-line front end over `tarefas_core`.
//!
//! # Responsibility
//! - Run one command per invocation against the configured database.
//! - Turn store errors into a single stderr line and exit status 1.
//!
//! Groups are addressed by name and tasks by their 1-based position in
//! `tasks <group>` output. Destructive commands only describe what they
//! would do unless `--yes` is passed.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tarefas_core::db::open_db;
use tarefas_core::{
    core_version, init_logging_from_config, ping, AppConfig, CredentialStore, Group, GroupStore,
    Session, SqliteKeyValueStore, Task, TaskId, TaskScope, TaskStore,
};

/// Tarefas - personal task lists grouped per user
#[derive(Debug, Parser)]
#[command(name = "tarefas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account
    Register { username: String, password: String },
    /// Start a session
    Login { username: String, password: String },
    /// End the current session
    Logout,
    /// Print the logged-in username
    Whoami,
    /// List registered users
    Users,
    /// Check the core library is linked
    Ping,
    /// Print the core library version
    Version,
    /// List your groups
    Groups,
    /// Create a group
    GroupAdd { name: String },
    /// Rename a group
    GroupRename { name: String, new_name: String },
    /// Delete a group and its tasks
    GroupDelete {
        name: String,
        /// Perform the deletion instead of describing it
        #[arg(long)]
        yes: bool,
    },
    /// List the tasks of a group
    Tasks { group: String },
    /// Add a task to a group
    TaskAdd {
        group: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Flip a task between pending and completed
    TaskToggle { group: String, position: usize },
    /// Replace a task's text
    TaskEdit {
        group: String,
        position: usize,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Delete a task
    TaskDelete {
        group: String,
        position: usize,
        /// Perform the deletion instead of describing it
        #[arg(long)]
        yes: bool,
    },
    /// Move every completed task of a group back to pending
    TaskReset {
        group: String,
        /// Perform the reset instead of describing it
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Ping => {
            println!("tarefas_core ping={}", ping());
            return Ok(());
        }
        Command::Version => {
            println!("tarefas_core version={}", core_version());
            return Ok(());
        }
        _ => {}
    }

    let config = AppConfig::from_env()?;
    init_logging_from_config(&config)?;
    let conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open database `{}`", config.db_path.display()))?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let mut credentials = CredentialStore::open(kv)?;

    match command {
        Command::Register { username, password } => {
            let user = credentials.register(&username, &password)?;
            println!("registered {}", user.username);
        }
        Command::Login { username, password } => {
            let session = credentials.login(&username, &password)?;
            println!("welcome, {}", session.username());
        }
        Command::Users => {
            for user in credentials.users() {
                println!("{}  (since {})", user.username, user.created_at.format("%Y-%m-%d"));
            }
            println!("{} user(s)", credentials.users_count());
        }
        command => {
            let session = credentials
                .resume_session()?
                .ok_or_else(|| anyhow!("not logged in; run `tarefas login <username> <password>`"))?;
            match command {
                Command::Logout => {
                    credentials.logout()?;
                    println!("logged out");
                }
                Command::Whoami => println!("{}", session.username()),
                command => {
                    let mut app = App {
                        session,
                        groups: GroupStore::new(kv),
                        tasks: TaskStore::new(kv),
                    };
                    app.dispatch(command)?;
                }
            }
        }
    }
    Ok(())
}

struct App<'conn> {
    session: Session,
    groups: GroupStore<SqliteKeyValueStore<'conn>>,
    tasks: TaskStore<SqliteKeyValueStore<'conn>>,
}

impl App<'_> {
    fn dispatch(&mut self, command: Command) -> Result<()> {
        let username = self.session.username().to_string();
        self.groups.load(&username)?;

        match command {
            Command::Groups => {
                for group in self.groups.groups() {
                    println!("{}", group.name);
                }
                println!("{} group(s)", self.groups.groups_count());
            }
            Command::GroupAdd { name } => {
                let group = self.groups.create(&name, &username)?;
                println!("created group {}", group.name);
            }
            Command::GroupRename { name, new_name } => {
                let id = self.group_by_name(&name)?.id;
                let group = self.groups.rename(&id, &new_name, &username)?;
                println!("group is now {}", group.name);
            }
            Command::GroupDelete { name, yes } => {
                let id = self.group_by_name(&name)?.id;
                let deletion = self.groups.request_delete(&id, &username)?;
                if !yes {
                    println!(
                        "would delete group {} and its {} task(s); pass --yes to confirm",
                        deletion.group().name,
                        deletion.task_count()
                    );
                    return Ok(());
                }
                let group = self.groups.confirm_delete(deletion)?;
                println!("deleted group {}", group.name);
            }
            Command::Tasks { group } => {
                let scope = self.scope_for(&group)?;
                self.tasks.load(&scope)?;
                print_tasks(self.tasks.tasks());
                println!(
                    "{} pending, {} completed",
                    self.tasks.pending_count(),
                    self.tasks.completed_count()
                );
            }
            Command::TaskAdd { group, text } => {
                let scope = self.scope_for(&group)?;
                let task = self.tasks.create(&text.join(" "), &scope)?;
                println!("added: {}", task.text);
            }
            Command::TaskToggle { group, position } => {
                let scope = self.scope_for(&group)?;
                let id = self.task_at(&scope, position)?;
                let task = self.tasks.toggle(&id, &scope)?;
                let state = if task.completed { "completed" } else { "pending" };
                println!("{}: {state}", task.text);
            }
            Command::TaskEdit {
                group,
                position,
                text,
            } => {
                let scope = self.scope_for(&group)?;
                let id = self.task_at(&scope, position)?;
                let task = self.tasks.edit(&id, &text.join(" "), &scope)?;
                println!("edited: {}", task.text);
            }
            Command::TaskDelete {
                group,
                position,
                yes,
            } => {
                let scope = self.scope_for(&group)?;
                let id = self.task_at(&scope, position)?;
                let deletion = self.tasks.request_delete(&id, &scope)?;
                if !yes {
                    println!(
                        "would delete task \"{}\"; pass --yes to confirm",
                        deletion.task().text
                    );
                    return Ok(());
                }
                self.tasks.confirm_delete(deletion)?;
                println!("deleted");
            }
            Command::TaskReset { group, yes } => {
                let scope = self.scope_for(&group)?;
                let request = self.tasks.request_reset(&scope)?;
                if !yes {
                    println!(
                        "would reset {} completed task(s); pass --yes to confirm",
                        request.count()
                    );
                    return Ok(());
                }
                let count = self.tasks.confirm_reset(request)?;
                println!("{count} task(s) reset to pending");
            }
            _ => bail!("this command does not run against a session"),
        }
        Ok(())
    }

    fn group_by_name(&self, name: &str) -> Result<Group> {
        let name = name.trim();
        self.groups
            .groups()
            .iter()
            .find(|group| group.name == name)
            .cloned()
            .ok_or_else(|| anyhow!("no group named `{name}`"))
    }

    fn scope_for(&mut self, group_name: &str) -> Result<TaskScope> {
        let group = self.group_by_name(group_name)?;
        self.groups.select(&group.id)?;
        Ok(TaskScope::grouped(self.session.username(), group.id))
    }

    fn task_at(&mut self, scope: &TaskScope, position: usize) -> Result<TaskId> {
        self.tasks.load(scope)?;
        position
            .checked_sub(1)
            .and_then(|index| self.tasks.tasks().get(index))
            .map(|task| task.id.clone())
            .ok_or_else(|| anyhow!("no task number {position}"))
    }
}

fn print_tasks(tasks: &[Task]) {
    for (index, task) in tasks.iter().enumerate() {
        let mark = if task.completed { 'x' } else { ' ' };
        println!("{:>3}. [{mark}] {}", index + 1, task.text);
    }
}
