use crate::domain::model::City;

/// Initial cities and their points, applied to an empty store.
pub fn seed_cities() -> Vec<City> {
    vec![
        City::new(
            "New York City",
            "The one with that big park.",
            "www.nycgo.com/",
        )
        .with_point(
            "Central Park",
            "The most visited urban park in the United States.",
        )
        .with_point(
            "Empire State Building",
            "A 102-story skyscraper located in Midtown Manhattan.",
        ),
        City::new(
            "Antwerp",
            "The one with the cathedral that was never really finished.",
            "www.visitantwerpen.be/en/home",
        )
        .with_point(
            "Cathedral",
            "A Gothic style cathedral, conceived by architects Jan and Pieter Appelmans.",
        )
        .with_point(
            "Antwerp Central Station",
            "The the finest example of railway architecture in Belgium.",
        ),
        City::new("Paris", "The one with that big tower.", "en.parisinfo.com/")
            .with_point(
                "Eiffel Tower",
                "A wrought iron lattice tower on the Champ de Mars, named after engineer Gustave Eiffel.",
            )
            .with_point("The Louvre", "The world's largest museum."),
        City::new("Sydney", "The one with Opera House", "www.sydney.com")
            .with_point(
                "Opera House",
                "The Sydney Opera House is a multi-venue performing arts centre at Sydney Harbour.",
            )
            .with_point(
                "Harbour Bridge",
                "A heritage-listed steel through arch bridge across Sydney Harbour.",
            )
            .with_point(
                "Darling Harbour",
                "A waterside pocket of Sydney with entertainment, museums, wildlife and dining on the water.",
            ),
        City::new(
            "Sofia",
            "The 15th largest city in the European Union.",
            "www.visitsofia.bg/en/",
        )
        .with_point(
            "National Palace of Culture",
            "The largest, multifunctional conference and exhibition centre in south-eastern Europe.",
        )
        .with_point(
            "Alexander Nevsky Cathedral",
            "A Neo-Byzantine cathedral, the cathedral church of the Patriarch of Bulgaria.",
        ),
    ]
}
