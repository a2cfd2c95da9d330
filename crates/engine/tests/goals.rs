use chrono::NaiveDate;
use sea_orm::Database;
use uuid::Uuid;

use engine::{Engine, EngineError, GoalCreateCmd, GoalUpdateCmd};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn goal_cmd(name: &str, target_minor: i64, priority: i32) -> GoalCreateCmd {
    GoalCreateCmd {
        name: name.to_string(),
        description: None,
        target_amount_minor: target_minor,
        current_amount_minor: 0,
        target_date: None,
        priority,
    }
}

#[tokio::test]
async fn goals_list_by_priority() {
    let engine = engine_with_db().await;

    engine.create_goal(goal_cmd("Vacation", 500_000, 3)).await.unwrap();
    engine
        .create_goal(goal_cmd("Emergency Fund", 1_000_000, 1))
        .await
        .unwrap();

    let goals = engine.list_goals().await.unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0].name, "Emergency Fund");
    assert_eq!(goals[1].name, "Vacation");
}

#[tokio::test]
async fn create_validates_inputs() {
    let engine = engine_with_db().await;

    let err = engine.create_goal(goal_cmd("Bad", 0, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine.create_goal(goal_cmd("Bad", 1_000, 4)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine.create_goal(goal_cmd("   ", 1_000, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let mut prefunded = goal_cmd("Laptop", 50_000, 2);
    prefunded.current_amount_minor = 60_000;
    let goal = engine.create_goal(prefunded).await.unwrap();
    assert!(goal.is_achieved);
}

#[tokio::test]
async fn add_money_flips_achieved_at_target() {
    let engine = engine_with_db().await;
    let goal = engine.create_goal(goal_cmd("Bike", 30_000, 2)).await.unwrap();

    let goal = engine.add_to_goal(goal.id, 10_000).await.unwrap();
    assert_eq!(goal.current_amount_minor, 10_000);
    assert!(!goal.is_achieved);

    let goal = engine.add_to_goal(goal.id, 20_000).await.unwrap();
    assert_eq!(goal.current_amount_minor, 30_000);
    assert!(goal.is_achieved);

    let err = engine.add_to_goal(goal.id, 0).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine.add_to_goal(Uuid::new_v4(), 1_000).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn add_money_rejects_overflowing_totals() {
    let engine = engine_with_db().await;

    let mut cmd = goal_cmd("Hoard", 1_000, 2);
    cmd.current_amount_minor = i64::MAX - 5;
    let goal = engine.create_goal(cmd).await.unwrap();

    let err = engine.add_to_goal(goal.id, 10).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    // The failed add must not have touched the stored total.
    let goals = engine.list_goals().await.unwrap();
    assert_eq!(goals[0].current_amount_minor, i64::MAX - 5);
}

#[tokio::test]
async fn update_recomputes_achieved_when_target_moves() {
    let engine = engine_with_db().await;
    let goal = engine.create_goal(goal_cmd("Camera", 80_000, 2)).await.unwrap();
    let goal = engine.add_to_goal(goal.id, 50_000).await.unwrap();
    assert!(!goal.is_achieved);

    let goal = engine
        .update_goal(GoalUpdateCmd {
            goal_id: goal.id,
            target_amount_minor: Some(40_000),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(goal.is_achieved);

    let target_date: NaiveDate = "2026-12-01".parse().unwrap();
    let goal = engine
        .update_goal(GoalUpdateCmd {
            goal_id: goal.id,
            target_date: Some(Some(target_date)),
            priority: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(goal.target_date, Some(target_date));
    assert_eq!(goal.priority, 1);
}

#[tokio::test]
async fn delete_removes_goal() {
    let engine = engine_with_db().await;
    let goal = engine.create_goal(goal_cmd("Old Goal", 10_000, 2)).await.unwrap();

    engine.delete_goal(goal.id).await.unwrap();
    let err = engine.delete_goal(goal.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.list_goals().await.unwrap().is_empty());
}
