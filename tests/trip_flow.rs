mod common;

use common::{services_for, spawn_apis};
use trip_planner::trip::{TravelStyle, TripRequest};
use trip_planner::weather::WeatherOutcome;
use trip_planner::{history, output, planner};

fn request(destination: &str) -> TripRequest {
    TripRequest {
        source_city: "Mumbai".into(),
        destination: destination.into(),
        days: 2,
        interests: "beaches, food".into(),
        travel_style: TravelStyle::MidRange,
        budget: Some(40_000),
    }
}

#[tokio::test]
async fn full_flow_produces_renderable_plan() {
    let (base, hits) = spawn_apis().await;
    let services = services_for(&base, "gemini-2.5-flash");

    let plan = planner::generate_trip_plan(&services, &request("Goa"))
        .await
        .unwrap();

    assert_eq!(plan.image_urls.len(), 5);
    assert!(matches!(plan.weather, WeatherOutcome::Available(_)));
    assert!(plan.coordinates.is_some());
    assert!(plan.cost_estimate.contains("Total Estimate"));
    assert!(plan.itinerary.contains("### Day 1"));
    // Cost table first, then the itinerary.
    assert_eq!(hits.llm(), 2);

    let html = output::render_trip_page(&plan).unwrap();
    assert!(html.contains("Slideshow of Goa"));
    assert!(html.contains("https://images.test/Goa_fort.jpg"));
    assert!(html.contains("Day 1"));
    assert!(html.contains("Day 2"));
    assert!(html.contains("🌇 sunset"));
    assert!(html.contains("INR 12000"));
    assert!(html.contains("Partly cloudy"));
    assert!(html.contains("openstreetmap.org"));
    assert!(!html.contains("**"));
}

#[tokio::test]
async fn unknown_place_still_renders_with_warnings() {
    let (base, _) = spawn_apis().await;
    let services = services_for(&base, "gemini-2.5-flash");

    let plan = planner::generate_trip_plan(&services, &request("Atlantis"))
        .await
        .unwrap();
    assert!(matches!(plan.weather, WeatherOutcome::Unavailable(_)));
    assert!(plan.coordinates.is_none());

    let html = output::render_trip_page(&plan).unwrap();
    assert!(html.contains("Weather data not available"));
}

#[tokio::test]
async fn llm_failure_fails_the_flow() {
    let (base, _) = spawn_apis().await;
    let services = services_for(&base, "broken-model");

    assert!(
        planner::generate_trip_plan(&services, &request("Goa"))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn invalid_request_makes_no_calls() {
    let (base, hits) = spawn_apis().await;
    let services = services_for(&base, "gemini-2.5-flash");

    let mut req = request("Goa");
    req.days = 0;
    let err = planner::generate_trip_plan(&services, &req).await.unwrap_err();
    assert!(err.to_string().contains("between 1 and 30"));
    assert_eq!(hits.photos(), 0);
    assert_eq!(hits.llm(), 0);
}

#[tokio::test]
async fn saved_plan_reloads_identically() {
    let (base, _) = spawn_apis().await;
    let services = services_for(&base, "gemini-2.5-flash");
    let plan = planner::generate_trip_plan(&services, &request("Panaji, Goa"))
        .await
        .unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("history");
    let path = history::save_plan_in(&dir, &plan).unwrap();
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("-panaji-goa.json")
    );

    let loaded = history::load_plan(&path).unwrap();
    assert_eq!(loaded.request, plan.request);
    assert_eq!(loaded.weather, plan.weather);
    assert_eq!(
        output::render_trip_page(&loaded).unwrap(),
        output::render_trip_page(&plan).unwrap()
    );
    assert_eq!(history::list_plans_in(&dir).unwrap(), vec![path]);
}

#[tokio::test]
async fn saving_twice_in_one_instant_keeps_both_plans() {
    let (base, _) = spawn_apis().await;
    let services = services_for(&base, "gemini-2.5-flash");
    let plan = planner::generate_trip_plan(&services, &request("Goa"))
        .await
        .unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let first = history::save_plan_in(tmp.path(), &plan).unwrap();
    let second = history::save_plan_in(tmp.path(), &plan).unwrap();

    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
    assert_eq!(history::list_plans_in(tmp.path()).unwrap(), vec![second, first]);
}
