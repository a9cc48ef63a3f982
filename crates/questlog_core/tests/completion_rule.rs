use questlog_core::{
    attempt_completion, Decision, Difficulty, FollowupMutation, RejectReason, Task, TaskCategory,
};
use std::collections::HashSet;
use uuid::Uuid;

fn task(category: TaskCategory, difficulty: Difficulty) -> Task {
    Task::new(Uuid::new_v4(), "rule subject", category, difficulty, 0)
}

#[test]
fn daily_already_in_todays_set_is_rejected() {
    let daily = task(TaskCategory::Daily, Difficulty::Medium);
    let completed_today = HashSet::from([daily.id]);

    assert_eq!(
        attempt_completion(&daily, &completed_today),
        Decision::Reject(RejectReason::AlreadyCompletedToday)
    );
}

#[test]
fn daily_not_yet_completed_is_accepted_without_followup() {
    let daily = task(TaskCategory::Daily, Difficulty::Hard);
    let other = task(TaskCategory::Daily, Difficulty::Easy);
    let completed_today = HashSet::from([other.id]);

    assert_eq!(
        attempt_completion(&daily, &completed_today),
        Decision::Accept {
            xp_awarded: 35,
            followup: FollowupMutation::NoOp,
        }
    );
}

#[test]
fn todo_is_accepted_and_deactivated() {
    let todo = task(TaskCategory::Todo, Difficulty::Medium);

    assert_eq!(
        attempt_completion(&todo, &HashSet::new()),
        Decision::Accept {
            xp_awarded: 20,
            followup: FollowupMutation::DeactivateTask(todo.id),
        }
    );
}

#[test]
fn todo_is_not_deduplicated_by_todays_set() {
    // Re-offering an archived todo is prevented by the caller, not here.
    let todo = task(TaskCategory::Todo, Difficulty::Easy);
    let decision = attempt_completion(&todo, &HashSet::from([todo.id]));
    assert!(decision.is_accepted());
}

#[test]
fn habit_is_always_accepted() {
    let habit = task(TaskCategory::Habit, Difficulty::Easy);
    let completed_today = HashSet::from([habit.id]);

    for _ in 0..3 {
        assert_eq!(
            attempt_completion(&habit, &completed_today),
            Decision::Accept {
                xp_awarded: 10,
                followup: FollowupMutation::NoOp,
            }
        );
    }
}

#[test]
fn inactive_flag_is_not_rechecked_by_rule() {
    let mut habit = task(TaskCategory::Habit, Difficulty::Medium);
    habit.active = false;
    assert!(attempt_completion(&habit, &HashSet::new()).is_accepted());
}
