use crate::error::{Error, Result};
use crate::planner::TripPlan;
use crate::text::{self, CostTable, DayBlock};
use crate::trip::{MAX_DAYS, MIN_DAYS, TravelStyle, TripForm};
use crate::weather::WeatherOutcome;
use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    form: FormView,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "trip.html")]
struct TripPage {
    form: FormView,
    destination: String,
    destination_title: String,
    first_image: String,
    photos_json: String,
    days: Vec<DayBlock>,
    cost: CostTable,
    weather: Option<WeatherView>,
    weather_message: String,
    map_url: String,
    coordinates_label: String,
    generated_at: String,
}

#[allow(dead_code)] // fields used by Askama template
struct FormView {
    source_city: String,
    destination: String,
    days: String,
    interests: String,
    budget: String,
    styles: Vec<StyleOption>,
    min_days: u32,
    max_days: u32,
}

#[allow(dead_code)] // fields used by Askama template
struct StyleOption {
    label: &'static str,
    selected: bool,
}

#[allow(dead_code)] // fields used by Askama template
struct WeatherView {
    description: String,
    temperature: String,
    feels_like: String,
    humidity: String,
    wind_speed: String,
    icon: String,
}

fn form_view(form: &TripForm) -> FormView {
    let selected = TravelStyle::parse(&form.travel_style).unwrap_or_default();
    FormView {
        source_city: form.source_city.clone(),
        destination: form.destination.clone(),
        days: form.days.clone(),
        interests: form.interests.clone(),
        budget: form.budget.clone(),
        styles: TravelStyle::ALL
            .iter()
            .map(|s| StyleOption {
                label: s.label(),
                selected: *s == selected,
            })
            .collect(),
        min_days: MIN_DAYS,
        max_days: MAX_DAYS,
    }
}

/// The empty form, or the submitted one with an error banner underneath.
pub fn render_form_page(form: &TripForm, error: Option<&str>) -> Result<String> {
    let page = IndexPage {
        form: form_view(form),
        error: error.map(String::from),
    };
    Ok(page.render()?)
}

/// Render a generated plan. The itinerary gets emoji before it is split into
/// day blocks; the cost text is parsed into a table when it contains one.
pub fn render_trip_page(plan: &TripPlan) -> Result<String> {
    let destination = plan.request.destination.clone();

    // `<` is escaped so a URL can never close the script element.
    let photos_json = serde_json::to_string(&plan.image_urls)
        .map_err(|e| Error::parse(format!("serialize photo URLs: {e}")))?
        .replace('<', "\\u003c");

    let (weather, weather_message) = match &plan.weather {
        WeatherOutcome::Available(w) => (
            Some(WeatherView {
                description: w.description.clone(),
                temperature: w.temperature.to_string(),
                feels_like: w.feels_like.to_string(),
                humidity: w.humidity.to_string(),
                wind_speed: w.wind_speed.to_string(),
                icon: w.icon.clone(),
            }),
            String::new(),
        ),
        WeatherOutcome::Unavailable(message) => (None, message.clone()),
    };

    let (map_url, coordinates_label) = plan
        .coordinates
        .as_ref()
        .map(|c| {
            (
                c.map_url(),
                format!("{:.4}, {:.4}", c.latitude, c.longitude),
            )
        })
        .unwrap_or_default();

    let page = TripPage {
        form: form_view(&TripForm::from(&plan.request)),
        destination_title: text::title_case(&destination),
        destination,
        first_image: plan.image_urls.first().cloned().unwrap_or_default(),
        photos_json,
        days: text::split_days(&text::add_emojis(&plan.itinerary)),
        cost: text::parse_cost_table(&plan.cost_estimate),
        weather,
        weather_message,
        map_url,
        coordinates_label,
        generated_at: plan.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    };

    Ok(page.render()?)
}
