use questlog_core::db::open_db_in_memory;
use questlog_core::{
    Difficulty, NewTaskRequest, RepoError, SqliteTaskRepository, Task, TaskCategory,
    TaskListQuery, TaskRepository, TaskService, TaskValidationError,
};
use rusqlite::params;
use uuid::Uuid;

fn request(title: &str, category: TaskCategory, difficulty: Difficulty) -> NewTaskRequest {
    NewTaskRequest {
        title: title.to_string(),
        category,
        difficulty,
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let user = Uuid::new_v4();

    let task = Task::new(user, "drink water", TaskCategory::Daily, Difficulty::Easy, 1_000);
    let id = repo.create_task(&task).unwrap();

    let loaded = repo.get_task(user, id).unwrap().unwrap();
    assert_eq!(loaded, task);
}

#[test]
fn tasks_are_invisible_to_other_users() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let task = Task::new(owner, "private", TaskCategory::Todo, Difficulty::Hard, 0);
    repo.create_task(&task).unwrap();

    assert!(repo.get_task(stranger, task.id).unwrap().is_none());
    assert!(repo
        .list_tasks(stranger, &TaskListQuery::default())
        .unwrap()
        .is_empty());
    assert!(matches!(
        repo.set_task_active(stranger, task.id, false),
        Err(RepoError::TaskNotFound(id)) if id == task.id
    ));
    assert!(matches!(
        repo.delete_task(stranger, task.id),
        Err(RepoError::TaskNotFound(_))
    ));
    assert!(repo.get_task(owner, task.id).unwrap().unwrap().active);
}

#[test]
fn list_filters_by_active_and_category_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let user = Uuid::new_v4();

    let old_daily = Task::new(user, "old", TaskCategory::Daily, Difficulty::Easy, 100);
    let new_daily = Task::new(user, "new", TaskCategory::Daily, Difficulty::Easy, 200);
    let habit = Task::new(user, "habit", TaskCategory::Habit, Difficulty::Medium, 150);
    let mut archived = Task::new(user, "done", TaskCategory::Todo, Difficulty::Hard, 300);
    archived.active = false;
    for task in [&old_daily, &new_daily, &habit, &archived] {
        repo.create_task(task).unwrap();
    }

    let active = repo.list_tasks(user, &TaskListQuery::active_only()).unwrap();
    let titles: Vec<_> = active.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["new", "habit", "old"]);

    let dailies = TaskListQuery {
        active: None,
        categories: vec![TaskCategory::Daily],
    };
    assert_eq!(repo.list_tasks(user, &dailies).unwrap().len(), 2);

    let archived_only = TaskListQuery {
        active: Some(false),
        categories: Vec::new(),
    };
    let rows = repo.list_tasks(user, &archived_only).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, archived.id);
}

#[test]
fn service_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let err = service
        .create_task(
            Uuid::new_v4(),
            &request("   ", TaskCategory::Habit, Difficulty::Easy),
            0,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::EmptyTitle)
    ));
}

#[test]
fn service_groups_board_and_toggles_archive() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let user = Uuid::new_v4();

    let daily = service
        .create_task(user, &request(" stretch ", TaskCategory::Daily, Difficulty::Easy), 1)
        .unwrap();
    service
        .create_task(user, &request("read", TaskCategory::Habit, Difficulty::Medium), 2)
        .unwrap();
    assert_eq!(daily.title, "stretch");

    let board = service.task_board(user).unwrap();
    assert_eq!(board.daily.len(), 1);
    assert_eq!(board.habit.len(), 1);
    assert!(board.todo.is_empty());
    assert_eq!(board.len(), 2);

    assert!(!service.toggle_active(user, daily.id).unwrap());
    assert!(!service.get_task(user, daily.id).unwrap().unwrap().active);
    assert!(service.toggle_active(user, daily.id).unwrap());

    service.delete_task(user, daily.id).unwrap();
    assert!(service.get_task(user, daily.id).unwrap().is_none());
    assert!(matches!(
        service.toggle_active(user, daily.id),
        Err(RepoError::TaskNotFound(_))
    ));
}

#[test]
fn corrupted_row_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let user = Uuid::new_v4();

    conn.execute(
        "INSERT INTO tasks (id, user_id, title, type, difficulty, active, created_at)
         VALUES ('not-a-uuid', ?1, 'broken', 'daily', 'easy', 1, 0);",
        params![user.to_string()],
    )
    .unwrap();

    let err = repo
        .list_tasks(user, &TaskListQuery::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("tasks.id")));
}
