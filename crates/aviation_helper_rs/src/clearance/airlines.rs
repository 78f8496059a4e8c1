use std::collections::HashMap;

use serde::{Deserialize, Deserializer, de};

use crate::errors::Error;
#[cfg(feature = "fs")]
use std::{fs::File, io::BufReader};

/// Spoken callsign, ICAO designator and display name of the airlines every
/// [`AirlineTable`] knows without loading a database.
const BUILTIN_AIRLINES: &[(&str, &str, &str)] = &[
    ("AEROFLOT", "AFL", "Aeroflot"),
    ("AIRFRANS", "AFR", "Air France"),
    ("AMERICAN", "AAL", "American Airlines"),
    ("AUSTRIAN", "AUA", "Austrian Airlines"),
    ("BEELINE", "BEL", "Brussels Airlines"),
    ("CONDOR", "CFG", "Condor"),
    ("CSA", "CSA", "Czech Airlines"),
    ("DELTA", "DAL", "Delta Air Lines"),
    ("EASY", "EZY", "easyJet"),
    ("EMIRATES", "UAE", "Emirates"),
    ("EUROWINGS", "EWG", "Eurowings"),
    ("FINNAIR", "FIN", "Finnair"),
    ("KLM", "KLM", "KLM"),
    ("LUFTHANSA", "DLH", "Lufthansa"),
    ("NORSHUTTLE", "NAX", "Norwegian"),
    ("POLLOT", "LOT", "LOT Polish Airlines"),
    ("QATARI", "QTR", "Qatar Airways"),
    ("RYANAIR", "RYR", "Ryanair"),
    ("SCANDINAVIAN", "SAS", "Scandinavian Airlines"),
    ("SHAMROCK", "EIN", "Aer Lingus"),
    ("SKYTRAVEL", "TVS", "Smartwings"),
    ("SPEEDBIRD", "BAW", "British Airways"),
    ("SWISS", "SWR", "Swiss"),
    ("TURKISH", "THY", "Turkish Airlines"),
    ("UNITED", "UAL", "United Airlines"),
    ("WIZZAIR", "WZZ", "Wizz Air"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct AirlineEntry {
    #[serde(deserialize_with = "deserialize_string_as_i32")]
    pub id: i32,
    pub name: String,
    #[serde(deserialize_with = "deserialize_option_string_n")]
    pub alias: Option<String>,
    #[serde(deserialize_with = "deserialize_option_string")]
    pub iata: Option<String>,
    #[serde(deserialize_with = "deserialize_option_string")]
    pub icao: Option<String>,
    #[serde(deserialize_with = "deserialize_option_string")]
    pub callsign: Option<String>,
    pub country: String,
    #[serde(deserialize_with = "deserialize_bool")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Airlines(pub Vec<AirlineEntry>);

impl Airlines {
    pub fn load_airlines<R>(reader: R) -> Result<Self, Error>
    where
        R: std::io::Read,
    {
        let res = serde_json::from_reader(reader)?;
        Ok(res)
    }

    #[cfg(feature = "fs")]
    pub fn load_airlines_from_file() -> Result<Self, Error> {
        let file = File::open(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/known-strings/airlines.json"
        ))?;
        let reader = BufReader::new(file);
        Self::load_airlines(reader)
    }
}

/// Lookup from spoken airline callsigns (`LUFTHANSA`) and ICAO designators (`DLH`)
/// to display names (`Lufthansa`).
#[derive(Debug, Clone)]
pub struct AirlineTable {
    callsign_to_name: HashMap<String, String>,
    icao_to_name: HashMap<String, String>,
}

impl Default for AirlineTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AirlineTable {
    pub fn builtin() -> Self {
        let mut table = Self {
            callsign_to_name: HashMap::new(),
            icao_to_name: HashMap::new(),
        };
        for (callsign, icao, name) in BUILTIN_AIRLINES {
            table.insert(callsign, Some(*icao), name);
        }
        table
    }

    /// Built-in table extended by every active single-word callsign of `airlines`.
    pub fn with_airlines(airlines: &Airlines) -> Self {
        let mut table = Self::builtin();
        table.load_airlines(airlines);
        table
    }

    pub fn load_airlines(&mut self, airlines: &Airlines) {
        for airline in &airlines.0 {
            if !airline.active || airline.name.is_empty() {
                continue;
            }
            let icao = airline
                .icao
                .as_deref()
                .filter(|icao| *icao != "N/A" && icao.len() == 3);
            let Some(callsign) = &airline.callsign else {
                if let Some(icao) = icao {
                    self.icao_to_name
                        .entry(icao.to_uppercase())
                        .or_insert_with(|| airline.name.clone());
                }
                continue;
            };
            // Multi-word callsigns never survive tokenization as one token
            if callsign.split_whitespace().count() != 1 {
                continue;
            }
            if self.callsign_to_name.contains_key(&callsign.to_uppercase()) {
                continue;
            }
            self.insert(callsign, icao, &airline.name);
        }
    }

    fn insert(&mut self, callsign: &str, icao: Option<&str>, name: &str) {
        self.callsign_to_name
            .insert(callsign.to_uppercase(), name.to_string());
        if let Some(icao) = icao {
            self.icao_to_name
                .entry(icao.to_uppercase())
                .or_insert_with(|| name.to_string());
        }
    }

    /// Whether `word` is a spoken airline callsign.
    pub fn is_airline(&self, word: &str) -> bool {
        self.callsign_to_name.contains_key(word)
    }

    pub fn display_name(&self, word: &str) -> Option<&str> {
        self.callsign_to_name
            .get(word)
            .or_else(|| self.icao_to_name.get(word))
            .map(String::as_str)
    }

    /// Display name of the airline a canonical callsign belongs to. The callsign's
    /// whole alphabetic prefix has to be a known airline, so `LUFTHANSA5` matches
    /// and `RADARHELLOLUFTHANSA5` does not.
    pub fn airline_for_callsign(&self, callsign: &str) -> Option<&str> {
        let prefix_len = callsign
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(callsign.len());
        if prefix_len == 0 || prefix_len == callsign.len() {
            return None;
        }
        self.display_name(&callsign[..prefix_len])
    }

    pub fn len(&self) -> usize {
        self.callsign_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callsign_to_name.is_empty()
    }
}

fn deserialize_string_as_i32<'de, D>(d: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(d)?;
    let res = s.parse().map_err(|err| {
        serde::de::Error::custom(format!("Could not parse i32: {s}, Err: {err:?}"))
    })?;
    Ok(res)
}

fn deserialize_option_string_n<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(d)?;
    let res = s.filter(|s| s != "\\N");
    Ok(res)
}

fn deserialize_option_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(d)?;
    let res = s.filter(|s| !s.is_empty());
    Ok(res)
}

fn deserialize_bool<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(d)?;
    let res = match s.as_str() {
        "N" | "n" => false,
        "Y" | "y" => true,
        _ => {
            return Err(de::Error::invalid_value(
                de::Unexpected::Str(&s),
                &r#""Y" or "N""#,
            ));
        }
    };
    Ok(res)
}
