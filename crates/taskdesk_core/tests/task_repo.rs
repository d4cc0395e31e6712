use std::collections::HashSet;
use taskdesk_core::{
    InMemoryTaskRepository, Priority, RepoError, Task, TaskRepository, TaskState,
    TaskValidationError,
};

fn repo_with(titles: &[(&str, Priority)]) -> InMemoryTaskRepository {
    let mut repo = InMemoryTaskRepository::new();
    for (title, priority) in titles {
        repo.add(Task::new(*title, format!("about {title}"), *priority))
            .unwrap();
    }
    repo
}

#[test]
fn add_then_find_with_any_case_returns_identical_task() {
    let mut repo = InMemoryTaskRepository::new();
    let task = Task::new("Buy milk", "2% fat", Priority::Low);
    repo.add(task.clone()).unwrap();

    for variant in ["Buy milk", "buy milk", "BUY MILK", "bUy MiLk"] {
        assert_eq!(repo.find_by_title(variant).unwrap(), task);
    }
}

#[test]
fn add_preserves_insertion_order() {
    let repo = repo_with(&[
        ("first", Priority::Low),
        ("second", Priority::High),
        ("third", Priority::Medium),
    ]);

    let titles: Vec<String> = repo
        .list_all()
        .iter()
        .map(|task| task.title().to_string())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[test]
fn add_rejects_title_differing_only_by_case() {
    let mut repo = repo_with(&[("Buy milk", Priority::Low)]);

    let err = repo
        .add(Task::new("BUY MILK", "again", Priority::High))
        .unwrap_err();

    assert_eq!(err, RepoError::DuplicateTitle("BUY MILK".to_string()));
    assert!(err.is_validation());
    assert_eq!(repo.count(), 1);
    assert_eq!(repo.find_by_title("buy milk").unwrap().priority(), Priority::Low);
}

#[test]
fn add_rejects_blank_title() {
    let mut repo = InMemoryTaskRepository::new();
    let err = repo.add(Task::new("   ", "d", Priority::Low)).unwrap_err();

    assert_eq!(err, RepoError::InvalidTask(TaskValidationError::EmptyTitle));
    assert!(err.is_validation());
    assert_eq!(repo.count(), 0);
}

#[test]
fn remove_deletes_matching_task() {
    let mut repo = repo_with(&[("a", Priority::Low), ("B", Priority::Low), ("c", Priority::Low)]);

    repo.remove("b").unwrap();

    assert_eq!(repo.count(), 2);
    assert!(repo.find_by_title("B").unwrap_err().is_not_found());
}

#[test]
fn remove_unknown_title_is_not_found_and_keeps_collection() {
    let mut repo = repo_with(&[("a", Priority::Low)]);

    let err = repo.remove("zzz").unwrap_err();

    assert_eq!(err, RepoError::NotFound("zzz".to_string()));
    assert!(err.is_not_found());
    assert_eq!(repo.count(), 1);
}

#[test]
fn set_state_updates_in_place_and_is_idempotent() {
    let mut repo = repo_with(&[("a", Priority::Low), ("b", Priority::High)]);

    repo.set_state("A", TaskState::InProgress).unwrap();
    let once = repo.find_by_title("a").unwrap();
    repo.set_state("a", TaskState::InProgress).unwrap();
    let twice = repo.find_by_title("a").unwrap();

    assert_eq!(once.state(), TaskState::InProgress);
    assert_eq!(once, twice);
    assert_eq!(repo.list_all()[0].title(), "a");
}

#[test]
fn set_state_unknown_title_is_not_found() {
    let mut repo = repo_with(&[("a", Priority::Low)]);
    let err = repo.set_state("nope", TaskState::Done).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(title) if title == "nope"));
    assert_eq!(repo.list_all()[0].state(), TaskState::Pending);
}

#[test]
fn list_all_returns_a_detached_copy() {
    let repo = repo_with(&[("a", Priority::Low)]);

    let mut snapshot = repo.list_all();
    snapshot[0].set_state(TaskState::Done);
    snapshot.clear();

    assert_eq!(repo.count(), 1);
    assert_eq!(repo.find_by_title("a").unwrap().state(), TaskState::Pending);
}

#[test]
fn list_by_state_filters_and_partitions_list_all() {
    let mut repo = repo_with(&[
        ("a", Priority::Low),
        ("b", Priority::High),
        ("c", Priority::Medium),
        ("d", Priority::Low),
    ]);
    repo.set_state("b", TaskState::Done).unwrap();
    repo.set_state("d", TaskState::InProgress).unwrap();

    let mut union = HashSet::new();
    for state in TaskState::ALL {
        let group = repo.list_by_state(state);
        assert!(group.iter().all(|task| task.state() == state));
        for task in group {
            union.insert(task.title().to_string());
        }
    }

    let all: HashSet<String> = repo
        .list_all()
        .iter()
        .map(|task| task.title().to_string())
        .collect();
    assert_eq!(union, all);

    let pending: Vec<String> = repo
        .list_by_state(TaskState::Pending)
        .iter()
        .map(|task| task.title().to_string())
        .collect();
    assert_eq!(pending, vec!["a", "c"]);
}

#[test]
fn replace_all_swaps_the_whole_collection() {
    let mut repo = repo_with(&[("old", Priority::Low)]);

    repo.replace_all(vec![
        Task::new("new one", "", Priority::High),
        Task::new("new two", "", Priority::Low),
    ]);

    assert_eq!(repo.count(), 2);
    assert!(repo.find_by_title("old").is_err());
    assert_eq!(repo.list_all()[1].title(), "new two");
}
