use crate::config::PlannerConfig;
use crate::error::Result;
use crate::llm::LlmClient;
use crate::trip::TripRequest;
use tracing::info;

const COST_SYSTEM_PROMPT: &str = "You are a travel expert. You give realistic, current cost \
estimates for trips and always answer with the exact table format you are asked for.";

const ITINERARY_SYSTEM_PROMPT: &str = "You are a travel assistant. You write realistic, friendly \
day-wise travel itineraries with local experiences, popular spots, local food, estimated daily \
costs, travel tips and safety notes.";

pub fn cost_prompt(request: &TripRequest, config: &PlannerConfig) -> String {
    let currency = &config.currency;
    let days = request.days;
    let style = request.travel_style.label();
    format!(
        r#"Estimate the following costs (in {currency}) for a {days}-day {style_lower} trip from {home} to {destination}.

Return your answer in this exact format:

| Category             | Cost ({currency})      | Notes                            |
|----------------------|----------------|----------------------------------|
| Flight (round trip)  | {currency} XXXXX       | Budget airline from major city  |
| Accommodation        | {currency} XXXXX       | {style} hotel/hostel     |
| Local Transport      | {currency} XXXXX       | Metro, buses, local transport   |
| Food & Dining        | {currency} XXXXX/day   | Local affordable meals          |
| Activities           | {currency} XXXXX/day   | Attractions, entry tickets      |
| Miscellaneous        | {currency} XXXXX       | Visa, insurance, etc.           |
| **Total Estimate**   | {currency} XXXXX       | For {days} days total           |
"#,
        style_lower = style.to_lowercase(),
        home = config.home_country,
        destination = request.destination,
    )
}

pub fn itinerary_prompt(
    request: &TripRequest,
    weather_summary: &str,
    cost_estimates: &str,
    config: &PlannerConfig,
) -> String {
    let destination = &request.destination;
    let days = request.days;

    let origin = if request.source_city.is_empty() {
        String::new()
    } else {
        format!("The traveler starts from {}.\n", request.source_city)
    };
    let budget = match request.budget {
        Some(b) => format!("The total budget is {b} {}.", config.currency),
        None => format!(
            "There is no fixed budget; plan for a {} travel style.",
            request.travel_style.label().to_lowercase()
        ),
    };
    let interests = if request.interests.is_empty() {
        "general sightseeing"
    } else {
        request.interests.as_str()
    };

    format!(
        r#"Create a detailed day-wise travel itinerary for {destination} lasting {days} days.
{origin}{budget}
Traveler is interested in: {interests}. Estimated costs: {cost_estimates}
Current weather in {destination} is: {weather_summary}.
Suggest local experiences, popular spots, and local foods.
Include estimated daily costs, travel tips, and safety notes.
Make it realistic and friendly.

Return the itinerary in this format, one heading per day:
### Day 1: <short title>
- ...
### Day 2: <short title>
- ...
...
Total Estimate: ...

Start planning:
"#
    )
}

/// Ask the LLM for a markdown cost table.
pub async fn get_cost_estimates(
    llm: &LlmClient,
    request: &TripRequest,
    config: &PlannerConfig,
) -> Result<String> {
    info!(destination = %request.destination, days = request.days, "requesting cost estimates");
    let text = llm
        .complete(COST_SYSTEM_PROMPT, &cost_prompt(request, config))
        .await?;
    info!(chars = text.len(), "cost estimates received");
    Ok(text)
}

/// Ask the LLM for the day-by-day itinerary. The cost table and weather are
/// passed along so the plan stays consistent with both.
pub async fn generate_itinerary(
    llm: &LlmClient,
    request: &TripRequest,
    weather_summary: &str,
    cost_estimates: &str,
    config: &PlannerConfig,
) -> Result<String> {
    info!(destination = %request.destination, "requesting itinerary");
    let prompt = itinerary_prompt(request, weather_summary, cost_estimates, config);
    let text = llm.complete(ITINERARY_SYSTEM_PROMPT, &prompt).await?;
    info!(chars = text.len(), "itinerary received");
    Ok(text)
}
