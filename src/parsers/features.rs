//! Keyword rules turning a `;`-joined feature blob into a typed record.
//!
//! Each record kind has a rule table evaluated in order against every
//! segment. All rules run on every segment so independent flags can fire
//! together ("Terraza y balcón"); alternatives for a single field are
//! resolved inside the rule. A segment no rule claims lands in `extra`
//! (last one wins) and is reported with `warn!`.

use crate::models::{BasicFeatures, Building, EnergyCertificate, Status};
use crate::parsers::numeric::{first_digits, parse_joint_areas};
use crate::parsers::traits::FromRawText;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// A rule inspects one segment, updates the record and reports whether it matched
type Rule<T> = fn(&mut T, &str) -> bool;

/// Segment separator used by the scraper when joining list items
pub const SEGMENT_DELIMITER: char = ';';

static RE_ORDINAL_FLOOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)ª").unwrap());

fn segments(blob: &str) -> impl Iterator<Item = &str> {
    blob.split(SEGMENT_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Run `rules` over every segment of `blob`, returning the last unmatched one
fn apply_rules<T>(record: &mut T, rules: &[(&str, Rule<T>)], field: &str, blob: &str) -> Option<String> {
    let mut unmatched = None;

    for segment in segments(blob) {
        let mut matched = false;
        for (name, rule) in rules {
            if rule(record, segment) {
                debug!(field, rule = *name, segment, "Rule matched");
                matched = true;
            }
        }

        if !matched {
            warn!(field, segment, "Unrecognized segment, adding it to extra");
            unmatched = Some(segment.to_string());
        }
    }

    unmatched
}

// ---------------------------------------------------------------------------
// Características básicas
// ---------------------------------------------------------------------------

const BASIC_FEATURE_RULES: &[(&str, Rule<BasicFeatures>)] = &[
    ("areas", areas),
    ("rooms", rooms),
    ("bathrooms", bathrooms),
    ("terrace", terrace),
    ("balcony", balcony),
    ("state", state),
    ("orientation", orientation),
    ("built_in", built_in),
    ("heating", heating),
    ("reduced_mobility", reduced_mobility),
    ("garage", garage),
    ("semi_detached_house", semi_detached_house),
    ("storage_room", |f, s| flag(&mut f.storage_room, s, "Trastero")),
    ("air_conditioning", |f, s| flag(&mut f.air_conditioning, s, "Aire acondicionado")),
    ("built_in_wardrobes", |f, s| flag(&mut f.built_in_wardrobes, s, "Armarios empotrados")),
    ("green_areas", |f, s| flag(&mut f.green_areas, s, "Zonas verdes")),
    ("pool", |f, s| flag(&mut f.pool, s, "Piscina")),
    ("new_building_development", |f, s| {
        flag(&mut f.new_building_development, s, "Promoción de obra nueva")
    }),
];

fn flag(target: &mut bool, segment: &str, keyword: &str) -> bool {
    let found = segment.contains(keyword);
    *target |= found;
    found
}

fn text(target: &mut Option<String>, segment: &str, keyword: &str) -> bool {
    if segment.contains(keyword) {
        *target = Some(segment.to_string());
        return true;
    }
    false
}

fn number(target: &mut Option<i64>, segment: &str) -> bool {
    match first_digits(segment) {
        Some(n) => {
            *target = Some(n);
            true
        }
        None => false,
    }
}

fn areas(f: &mut BasicFeatures, segment: &str) -> bool {
    let (constructed, usable) = parse_joint_areas(segment);
    if constructed.is_some() {
        f.sqm_constructed = constructed;
    }
    if usable.is_some() {
        f.sqm_usable = usable;
    }
    constructed.is_some() || usable.is_some()
}

fn rooms(f: &mut BasicFeatures, segment: &str) -> bool {
    if !segment.contains("habitación") && !segment.contains("habitaciones") {
        return false;
    }
    if segment.contains("Sin ") {
        f.n_rooms = Some(0);
        return true;
    }
    number(&mut f.n_rooms, segment)
}

fn bathrooms(f: &mut BasicFeatures, segment: &str) -> bool {
    segment.contains("baño") && number(&mut f.bathrooms, segment)
}

fn terrace(f: &mut BasicFeatures, segment: &str) -> bool {
    flag(&mut f.terrace, &segment.to_lowercase(), "terraza")
}

fn balcony(f: &mut BasicFeatures, segment: &str) -> bool {
    flag(&mut f.balcony, &segment.to_lowercase(), "balcón")
}

fn state(f: &mut BasicFeatures, segment: &str) -> bool {
    text(&mut f.state, segment, "Segunda mano")
}

fn orientation(f: &mut BasicFeatures, segment: &str) -> bool {
    if !segment.contains("Orientación") {
        return false;
    }
    f.orientation = Some(segment.replace("Orientación ", "").trim().to_string());
    true
}

fn built_in(f: &mut BasicFeatures, segment: &str) -> bool {
    segment.contains("Construido en ") && number(&mut f.built_in, segment)
}

fn heating(f: &mut BasicFeatures, segment: &str) -> bool {
    if segment.to_lowercase().contains("calefacción") {
        f.heating = Some(segment.to_string());
        return true;
    }
    false
}

fn reduced_mobility(f: &mut BasicFeatures, segment: &str) -> bool {
    text(&mut f.reduced_mobility, segment, "movilidad reducida")
}

fn garage(f: &mut BasicFeatures, segment: &str) -> bool {
    text(&mut f.garage, segment, "garaje")
}

fn semi_detached_house(f: &mut BasicFeatures, segment: &str) -> bool {
    text(&mut f.semi_detached_house, segment, "Chalet")
}

impl FromRawText for BasicFeatures {
    fn from_raw_text(field: &str, blob: &str) -> Self {
        let mut features = BasicFeatures::default();
        features.extra = apply_rules(&mut features, BASIC_FEATURE_RULES, field, blob);
        features
    }
}

// ---------------------------------------------------------------------------
// Edificio
// ---------------------------------------------------------------------------

const BUILDING_RULES: &[(&str, Rule<Building>)] = &[
    ("elevator", elevator),
    ("floor", floor),
    ("inside", inside),
];

fn elevator(b: &mut Building, segment: &str) -> bool {
    if segment.contains("Sin ascensor") {
        b.elevator = Some(false);
    } else if segment.contains("Con ascensor") {
        b.elevator = Some(true);
    } else {
        return false;
    }
    true
}

fn floor(b: &mut Building, segment: &str) -> bool {
    if segment.contains("Entreplanta ") || segment.contains("Bajo") {
        b.floor = Some(0);
        return true;
    }
    if !segment.to_lowercase().contains("planta ") {
        return false;
    }
    match RE_ORDINAL_FLOOR
        .captures(segment)
        .and_then(|caps| caps[1].parse().ok())
    {
        Some(n) => {
            b.floor = Some(n);
            true
        }
        None => false,
    }
}

fn inside(b: &mut Building, segment: &str) -> bool {
    if segment.contains("interior") {
        b.inside = Some(true);
    } else if segment.contains("exterior") {
        b.inside = Some(false);
    } else {
        return false;
    }
    true
}

impl FromRawText for Building {
    fn from_raw_text(field: &str, blob: &str) -> Self {
        let mut building = Building::default();
        building.extra = apply_rules(&mut building, BUILDING_RULES, field, blob);
        building
    }
}

// ---------------------------------------------------------------------------
// Certificado energético
// ---------------------------------------------------------------------------

const ENERGY_CERTIFICATE_RULES: &[(&str, Rule<EnergyCertificate>)] = &[
    ("emissions", emissions),
    ("consumption", consumption),
    ("certificate", certificate),
];

/// A bare "Emisiones:" label without the value line is recognized but carries nothing.
/// The number is read between the label and its unit ("31 kg CO2/m² año").
fn labelled_value(target: &mut Option<f64>, segment: &str, label: &str) -> bool {
    if let Some((_, rest)) = segment.split_once(&format!("{} \n", label)) {
        let value = rest.split(char::is_alphabetic).next().unwrap_or_default();
        if let Some(n) = first_digits(value) {
            *target = Some(n as f64);
        }
    }
    segment.contains(label)
}

fn emissions(e: &mut EnergyCertificate, segment: &str) -> bool {
    labelled_value(&mut e.kwh_sqm_year_emissions, segment, "Emisiones:")
}

fn consumption(e: &mut EnergyCertificate, segment: &str) -> bool {
    labelled_value(&mut e.kg_co2_sqm_year_consumption, segment, "Consumo:")
}

fn certificate(e: &mut EnergyCertificate, segment: &str) -> bool {
    ["Inmueble exento", "En trámite", "No indicado"]
        .iter()
        .any(|status| text(&mut e.certificate, segment, status))
}

impl FromRawText for EnergyCertificate {
    fn from_raw_text(field: &str, blob: &str) -> Self {
        let mut certificate = EnergyCertificate::default();
        certificate.extra = apply_rules(&mut certificate, ENERGY_CERTIFICATE_RULES, field, blob);
        certificate
    }
}

// ---------------------------------------------------------------------------
// Situación de la vivienda
// ---------------------------------------------------------------------------

impl FromRawText for Status {
    fn from_raw_text(_field: &str, blob: &str) -> Self {
        Status {
            tenant: (!blob.trim().is_empty()).then(|| blob.to_string()),
        }
    }
}
