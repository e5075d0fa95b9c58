use crate::model::ForecastRecord;

pub fn forecast_prompt(location: &str, days: u8) -> String {
    format!(
        "Generate a realistic and current weather forecast for {location}. \
         Provide the current weather (including wind gusts if applicable, 'feels like' temperature, \
         sunrise/sunset times, and Air Quality Index), a 10-hour hourly forecast starting from the \
         next rounded hour, and a {days}-day daily forecast starting from tomorrow. \
         The output must be in JSON format matching the provided schema. \
         Use Celsius for temperature and km/h for wind speed. \
         The current date and time should be based on the location's timezone."
    )
}

pub fn alerts_prompt(location: &str) -> String {
    format!(
        "Generate a list of current, realistic weather alerts for {location}. \
         If there are no active alerts, return an empty array. \
         The output must be in JSON format matching the provided schema."
    )
}

pub fn follow_up_prompt(question: &str, record: &ForecastRecord) -> serde_json::Result<String> {
    let data = serde_json::to_string_pretty(record)?;

    Ok(format!(
        "Based on the following weather data, answer the user's question.\n\
         Weather Data: {data}\n\
         Question: \"{question}\"\n\n\
         Provide a friendly, conversational, and helpful response in a single paragraph. \
         Be concise and focus on the most relevant information from the data to answer the question."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn forecast_prompt_embeds_location_verbatim() {
        let prompt = forecast_prompt("  san josé, CR ", 5);
        assert!(prompt.contains("forecast for   san josé, CR ."));
        assert!(prompt.contains("5-day daily forecast"));
        assert!(prompt.contains("next rounded hour"));
        assert!(prompt.contains("Celsius"));
    }

    #[test]
    fn follow_up_prompt_carries_record_and_question() {
        let record = fixtures::record("Oslo, NO");
        let prompt = follow_up_prompt("Do I need an umbrella?", &record).unwrap();

        assert!(prompt.contains("\"location\": \"Oslo, NO\""));
        assert!(prompt.contains("Question: \"Do I need an umbrella?\""));
        assert!(prompt.contains("single paragraph"));
    }
}
