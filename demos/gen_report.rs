//! Generate an analysis report for validation testing

fn main() {
    let readings = r#"[
        { "date": "2024-11-23 10:00:00", "location": "Jersey City, NJ/USA", "accuracy": 10, "activity": "Personal" },
        { "date": "2024-11-23 10:02:00", "location": "Jersey City, NJ/USA", "accuracy": 12, "activity": "Personal" },
        { "date": "2024-11-23 10:15:00", "location": "Jersey City, NJ/USA", "accuracy": 2000, "activity": "Tower Jump" },
        { "date": "2024-11-23 10:16:00", "location": "New York - NY/USA", "accuracy": 15, "accuracy.1": 15 },
        { "date": "2024-11-23 10:17:00", "location": "New York - NY/USA", "accuracy": 18 },
        { "date": "2024-11-23 10:18:00", "location": null }
    ]"#;
    let aliases = r#"{ "NY": ["NEW YORK"], "NJ": ["JERSEY CITY"] }"#;

    match region_flux::analyze_readings(readings.to_string(), Some(aliases.to_string())) {
        Ok(report) => print!("{report}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
