use std::net::SocketAddr;

use nutrilog::app::build_app;
use nutrilog::client::{
    DeleteOutcome, FetchOutcome, FoodForm, HttpApi, MealSlot, NutritionApi, Tracker,
};
use nutrilog::state::AppState;
use time::macros::date;

async fn spawn_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_app(AppState::fake());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn api(addr: SocketAddr) -> HttpApi {
    HttpApi::new(&format!("http://{addr}/api")).unwrap()
}

#[tokio::test]
async fn log_a_day_end_to_end() {
    let addr = spawn_server().await;
    let day = date!(2024 - 03 - 05);

    let mut session = Tracker::new(api(addr), day);
    assert_eq!(session.select_date(day).await, FetchOutcome::Empty);
    assert!(session.meals().is_empty());

    let oats = session
        .add_food(
            MealSlot::Breakfast,
            FoodForm {
                name: "Oats".into(),
                calories: Some(300.0),
                protein: Some(10.0),
                carbs: Some(50.0),
                fat: Some(5.0),
            },
        )
        .await
        .unwrap();
    session
        .add_food(
            MealSlot::Dinner,
            FoodForm {
                name: "Soup".into(),
                calories: Some(200.0),
                ..FoodForm::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(session.totals().day.calories, 500.0);

    // a second session reads the same state from the backend
    let mut fresh = Tracker::new(api(addr), day);
    assert_eq!(fresh.select_date(day).await, FetchOutcome::Loaded);
    let breakfast = &fresh.meals().slot(MealSlot::Breakfast).foods;
    assert_eq!(breakfast.len(), 1);
    assert_eq!(breakfast[0].id, oats.id);
    assert_eq!(breakfast[0].name, "Oats");
    assert_eq!(breakfast[0].calories, Some(300.0));
    assert!(fresh.meals().slot(MealSlot::Lunch).foods.is_empty());
    assert_eq!(fresh.totals().meal(MealSlot::Dinner).calories, 200.0);

    // other dates are untouched
    assert_eq!(
        fresh.select_date(date!(2024 - 03 - 06)).await,
        FetchOutcome::Empty
    );

    session
        .remove_food(MealSlot::Breakfast, oats.id)
        .await
        .unwrap();
    assert!(session.meals().slot(MealSlot::Breakfast).foods.is_empty());

    let raw = api(addr).fetch_day(day.into()).await.unwrap().unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].name.as_deref(), Some("Dinner"));

    assert_eq!(
        api(addr).delete_food(oats.id).await.unwrap(),
        DeleteOutcome::NotFound
    );
    session
        .remove_food(MealSlot::Breakfast, oats.id)
        .await
        .unwrap();
    assert_eq!(session.error(), None);
}

#[tokio::test]
async fn unreachable_backend_degrades_to_defaults() {
    // bind then drop to get a port nobody listens on
    let addr = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap()
    };
    let mut session = Tracker::new(api(addr), date!(2024 - 03 - 05));
    assert_eq!(
        session.select_date(date!(2024 - 03 - 05)).await,
        FetchOutcome::Failed
    );
    assert_eq!(session.error(), Some("Failed to load meals data"));
    assert_eq!(session.meals().slots().len(), 3);
    assert!(session.meals().is_empty());
}

#[tokio::test]
async fn adding_before_selecting_keeps_foods_logged_elsewhere() {
    let addr = spawn_server().await;
    let day = date!(2024 - 03 - 05);

    let mut other = Tracker::new(api(addr), day);
    other.select_date(day).await;
    other
        .add_food(
            MealSlot::Lunch,
            FoodForm {
                name: "Salad".into(),
                calories: Some(150.0),
                ..FoodForm::default()
            },
        )
        .await
        .unwrap();

    let mut session = Tracker::new(api(addr), day);
    session
        .add_food(
            MealSlot::Breakfast,
            FoodForm {
                name: "Oats".into(),
                calories: Some(300.0),
                ..FoodForm::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(session.select_date(day).await, FetchOutcome::Loaded);
    assert_eq!(session.meals().slot(MealSlot::Lunch).foods[0].name, "Salad");
    assert_eq!(session.meals().slot(MealSlot::Breakfast).foods[0].name, "Oats");
    assert_eq!(session.totals().day.calories, 450.0);
}
