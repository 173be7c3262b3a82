//! Interactive prediction form.
//!
//! Prompts for each incident field using `dialoguer`, with the numeric
//! fields bounded and pre-filled and the two categorical fields offered as
//! selection lists.

use arrest_predictor::{
    ArrestClassifier, ArrestPredictor, IncidentInput, community_area_options, ward_options,
};
use arrest_predictor_incident_models::{
    DISTRICT_BOUNDS, FieldBounds, HOUR_BOUNDS, MONTH_BOUNDS, YEAR_BOUNDS,
};
use dialoguer::{Confirm, Input, Select};

/// Runs the input form in a loop until the user declines another
/// prediction.
///
/// Prediction failures are printed and the loop continues; they never end
/// the session.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read from or written to.
pub fn run<M: ArrestClassifier>(
    predictor: &ArrestPredictor<M>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Prediction Input");
    println!();

    loop {
        let input = prompt_incident()?;

        let rendered = crate::render_prediction(predictor, &input, false)?;
        if rendered.is_error {
            eprintln!("{}", rendered.text);
        } else {
            println!("{}", rendered.text);
        }
        println!();

        if !Confirm::new()
            .with_prompt("Make another prediction?")
            .default(true)
            .interact()?
        {
            return Ok(());
        }
    }
}

fn prompt_incident() -> Result<IncidentInput, Box<dyn std::error::Error>> {
    let year = prompt_number(YEAR_BOUNDS)?;
    let month = u8::try_from(prompt_number(MONTH_BOUNDS)?)?;
    let hour = u8::try_from(prompt_number(HOUR_BOUNDS)?)?;
    let district = u8::try_from(prompt_number(DISTRICT_BOUNDS)?)?;

    let wards = ward_options();
    let ward_idx = Select::new()
        .with_prompt("Ward")
        .items(wards)
        .default(0)
        .interact()?;

    let areas = community_area_options();
    let area_idx = Select::new()
        .with_prompt("Community Area")
        .items(areas)
        .default(0)
        .interact()?;

    Ok(IncidentInput {
        year,
        month,
        hour,
        district,
        ward: wards[ward_idx].clone(),
        community_area: areas[area_idx].clone(),
    })
}

fn prompt_number(bounds: FieldBounds) -> Result<u16, dialoguer::Error> {
    Input::<u16>::new()
        .with_prompt(format!("{} ({}-{})", bounds.label, bounds.min, bounds.max))
        .default(bounds.default)
        .validate_with(move |value: &u16| -> Result<(), String> {
            if bounds.contains(*value) {
                Ok(())
            } else {
                Err(format!(
                    "{} must be between {} and {}",
                    bounds.label, bounds.min, bounds.max
                ))
            }
        })
        .interact_text()
}
