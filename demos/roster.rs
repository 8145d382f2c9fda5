use chrono::{Duration, NaiveDate, NaiveDateTime};
use rangebuckets::TreeBuckets;

fn make_time(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 1, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid roster time")
}

fn time_to_string(time: &NaiveDateTime) -> String {
    time.format("%a %H:%M").to_string()
}

fn main() {
    let people = ["Alice", "Bob", "Carol"];
    let week_start = make_time(7, 0, 0);
    let mut roster: TreeBuckets<NaiveDateTime, &str> =
        TreeBuckets::constrained(week_start, week_start + Duration::weeks(1))
            .expect("week ends after it starts");

    // Everyone is on the desk from nine to five, Monday to Friday.
    for day in 7..12 {
        for person in &people {
            roster.spread(make_time(day, 9, 0), make_time(day, 17, 0), *person);
        }
    }

    // Monday lunch replaces the desk entirely.
    roster.cover(make_time(7, 12, 0), make_time(7, 13, 0), "Lunch");

    // Tuesday's meeting runs alongside whoever is on the desk,
    // and the weekend on-call shift is clipped to the week.
    roster.spread(make_time(8, 12, 0), make_time(8, 13, 0), "Meeting");
    roster.spread(make_time(12, 18, 0), make_time(15, 9, 0), "On call");

    for bucket in roster.iter() {
        println!(
            "{} - {}: {}",
            time_to_string(bucket.low()),
            time_to_string(bucket.high()),
            bucket.values().join(", ")
        );
    }

    let free: Vec<String> = roster
        .gaps(make_time(7, 9, 0), make_time(7, 17, 0))
        .map(|gap| format!("{} - {}", time_to_string(&gap.start), time_to_string(&gap.end)))
        .collect();
    println!("Unstaffed on Monday: {:?}", free);
}
