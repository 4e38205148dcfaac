//! Command execution and result printing.

use std::sync::Arc;

use serde::Serialize;

use app_state::permissions::require_user;
use app_state::CareState;
use care_service_lib::CareDb;
use common::{ActionResponse, AppResult, CareConfig};
use domain::view::{completion_progress, filter_tasks, group_by_day, tasks_on_day};
use domain::{parse_conditions, NewElderlyProfile, NewTask, Task, UserResponse};
use store::ChangeBus;

use super::{Command, CreateTaskArgs, ProfileAction, TaskAction, UserAction};

/// Task listing with its completion percentage
#[derive(Serialize)]
struct TaskListing<T> {
    progress: u8,
    tasks: T,
}

#[derive(Serialize)]
struct ThemeView {
    theme: domain::Theme,
}

/// Print the outcome as JSON; returns whether it succeeded
fn emit<T: Serialize>(result: AppResult<T>) -> bool {
    emit_response(ActionResponse::from(result))
}

fn emit_response<T: Serialize>(response: ActionResponse<T>) -> bool {
    let success = response.success;
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response");
            return false;
        }
    }
    success
}

fn emit_done(result: AppResult<()>) -> bool {
    emit_response(ActionResponse::from_unit(result))
}

/// Open the store, mount state and run one command
pub async fn run(command: Command, config: &CareConfig) -> bool {
    let bus = ChangeBus::new(&config.bus);
    let db = match CareDb::open(config, &bus).await {
        Ok(db) => Arc::new(db),
        Err(e) => return emit_done(Err(e)),
    };

    let mut state = CareState::for_db(db.clone());
    if let Err(e) = state.mount().await {
        return emit_done(Err(e));
    }

    if !command.is_public() {
        if let Err(e) = require_user(state.current_user()) {
            return emit_done(Err(e));
        }
    }

    let success = execute(command, &db, &mut state).await;
    bus.dispose();
    success
}

async fn execute(command: Command, db: &CareDb, state: &mut CareState) -> bool {
    match command {
        Command::Reset => emit_done(db.reset().await),
        Command::Login {
            identifier,
            password,
        } => emit(
            state
                .login(&identifier, &password)
                .await
                .map(UserResponse::from),
        ),
        Command::Signup {
            name,
            email,
            password,
        } => emit(
            state
                .signup(&name, &email, &password)
                .await
                .map(UserResponse::from),
        ),
        Command::Logout => emit_done(state.logout().await),
        Command::Whoami => emit(Ok(state.current_user().map(UserResponse::from))),
        Command::Tasks { action } => run_task_action(action, state).await,
        Command::Profiles { action } => run_profile_action(action, state).await,
        Command::Users { action } => run_user_action(action, state).await,
        Command::Theme { toggle } => {
            let result = if toggle {
                state.toggle_theme().await
            } else {
                Ok(state.theme())
            };
            emit(result.map(|theme| ThemeView { theme }))
        }
    }
}

async fn run_task_action(action: TaskAction, state: &mut CareState) -> bool {
    match action {
        TaskAction::List {
            filter,
            search,
            day,
            by_day,
        } => {
            let scoped: Vec<Task> = match day {
                Some(day) => tasks_on_day(state.tasks(), day).into_iter().cloned().collect(),
                None => state.tasks().to_vec(),
            };
            let tasks = filter_tasks(&scoped, filter, &search);
            let progress = completion_progress(tasks.iter().copied());
            if by_day {
                emit(Ok(TaskListing {
                    progress,
                    tasks: group_by_day(tasks),
                }))
            } else {
                emit(Ok(TaskListing {
                    progress,
                    tasks,
                }))
            }
        }
        TaskAction::Create(args) => emit(create_task(args, state).await),
        TaskAction::Assign {
            task_id,
            user_id,
            clear,
        } => {
            let result = match (user_id, clear) {
                (_, true) => state.assign_task(&task_id, None).await,
                (Some(user_id), false) => state.assign_task(&task_id, Some(user_id)).await,
                (None, false) => state.toggle_assignment(&task_id).await,
            };
            emit(result)
        }
        TaskAction::Status { task_id, status } => {
            let result = match status {
                Some(status) => state.update_task_status(&task_id, status).await,
                None => state.toggle_completion(&task_id).await,
            };
            emit(result)
        }
        TaskAction::Delete { task_id } => emit_done(state.delete_task(&task_id).await),
    }
}

async fn create_task(args: CreateTaskArgs, state: &mut CareState) -> AppResult<Task> {
    let creator = require_user(state.current_user())?.id.clone();

    let mut input = NewTask::new(
        args.title,
        args.elderly,
        creator,
        args.at,
        args.priority,
        args.task_type,
    );
    input.description = args.description;
    input.assigned_to_id = args.assign;
    state.create_task(input).await
}

async fn run_profile_action(action: ProfileAction, state: &mut CareState) -> bool {
    match action {
        ProfileAction::List => emit(Ok(state.elderly_profiles().to_vec())),
        ProfileAction::Create {
            name,
            gender,
            conditions,
            notes,
        } => {
            let input = NewElderlyProfile {
                id: None,
                name,
                gender: gender.into(),
                avatar_url: None,
                conditions: parse_conditions(&conditions),
                notes,
            };
            emit(state.create_profile(input).await)
        }
        ProfileAction::Delete { profile_id } => emit_done(state.delete_profile(&profile_id).await),
    }
}

async fn run_user_action(action: UserAction, state: &mut CareState) -> bool {
    match action {
        UserAction::List => emit(Ok(state
            .users()
            .iter()
            .map(UserResponse::from)
            .collect::<Vec<_>>())),
        UserAction::Role { user_id, role } => emit(
            state
                .update_user_role(&user_id, role.into())
                .await
                .map(UserResponse::from),
        ),
        UserAction::Delete { user_id } => emit_done(state.delete_user(&user_id).await),
    }
}
