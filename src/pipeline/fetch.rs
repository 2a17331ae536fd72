//! Recipe lookup: query the catalogue and normalise the response.
//!
//! One GET per canonical key — a name search, or a random pick for the
//! reserved `random` key. The raw drink object uses fifteen indexed
//! `strIngredient{i}` / `strMeasure{i}` fields; the index was never
//! semantically meaningful beyond ordering, so the normalised
//! [`RecipeRecord`] carries an ordered sequence of [`IngredientEntry`]
//! values instead. Source order is preserved, gaps and all — slots are
//! never renumbered.
//!
//! A response whose `drinks` field is null or absent means "no such drink";
//! that is reported as `Ok(None)`, not as an error. Transport failures, on
//! the other hand, are fatal for the whole run.

use crate::config::RunConfig;
use crate::error::CocktailError;
use crate::pipeline::image::{self, TempStore};
use crate::pipeline::input::RANDOM_KEY;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

/// The catalogue exposes at most this many ingredient/measure slots.
pub const INGREDIENT_SLOTS: usize = 15;

/// One ingredient of a recipe, in catalogue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub ingredient: String,
    /// The paired measure. Carried even when the catalogue left it null —
    /// it is not independently validated.
    pub measure: Option<String>,
}

/// Normalised in-memory representation of one drink.
///
/// Created fresh per lookup, enriched with the local `image` path by the
/// image retriever, consumed once by the renderer. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub name: String,
    pub instructions: String,
    pub glass: String,
    /// Ordered, possibly sparse subset of the catalogue's 1..=15 slots.
    pub ingredients: Vec<IngredientEntry>,
    /// Local thumbnail path, filled in after image retrieval.
    pub image: Option<PathBuf>,
}

/// Wire shape of both `search.php` and `random.php` responses.
///
/// The indexed ingredient fields make the drink object an open set of keys,
/// so each drink lands in a JSON map rather than a fixed struct.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    drinks: Option<Vec<serde_json::Map<String, Value>>>,
}

/// Look up one canonical key and produce a complete [`RecipeRecord`],
/// including its locally stored thumbnail.
///
/// Returns `Ok(None)` when the catalogue has no match — the caller skips
/// document creation for that key and continues.
pub async fn fetch_recipe(
    client: &reqwest::Client,
    key: &str,
    temp: &TempStore,
    config: &RunConfig,
) -> Result<Option<RecipeRecord>, CocktailError> {
    let base = config.api_base_url.trim_end_matches('/');
    let request = if key == RANDOM_KEY {
        client.get(format!("{base}/random.php"))
    } else {
        client.get(format!("{base}/search.php")).query(&[("s", key)])
    };

    let response = request
        .send()
        .await
        .map_err(|e| CocktailError::ApiUnreachable {
            url: base.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(CocktailError::LookupFailed {
            key: key.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body: SearchResponse =
        response
            .json()
            .await
            .map_err(|e| CocktailError::BadApiResponse {
                key: key.to_string(),
                detail: e.to_string(),
            })?;

    let drink = match body.drinks.as_ref().and_then(|d| d.first()) {
        Some(drink) => drink,
        None => {
            debug!("No match for '{}'", key);
            return Ok(None);
        }
    };

    let mut record = map_drink(drink);
    info!("Found '{}' for key '{}'", record.name, key);

    let thumb_url =
        str_field(drink, "strDrinkThumb").ok_or_else(|| CocktailError::BadApiResponse {
            key: key.to_string(),
            detail: "drink has no strDrinkThumb image URL".to_string(),
        })?;
    record.image = Some(image::retrieve(client, &thumb_url, temp, config).await?);

    Ok(Some(record))
}

/// Map a raw drink object into a [`RecipeRecord`] (without the image).
///
/// `strDrink`, `strInstructions` and `strGlass` are copied verbatim. Slot
/// `i` is included iff `strIngredient{i}` is a non-null string; the paired
/// measure may itself be null and is carried as `None` in that case.
pub fn map_drink(drink: &serde_json::Map<String, Value>) -> RecipeRecord {
    let mut ingredients = Vec::new();
    for i in 1..=INGREDIENT_SLOTS {
        if let Some(ingredient) = str_field(drink, &format!("strIngredient{i}")) {
            ingredients.push(IngredientEntry {
                ingredient,
                measure: str_field(drink, &format!("strMeasure{i}")),
            });
        }
    }

    RecipeRecord {
        name: str_field(drink, "strDrink").unwrap_or_default(),
        instructions: str_field(drink, "strInstructions").unwrap_or_default(),
        glass: str_field(drink, "strGlass").unwrap_or_default(),
        ingredients,
        image: None,
    }
}

/// A string field of the drink object; null and absent both map to `None`.
fn str_field(drink: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    drink.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn drink_object(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().expect("test drink is an object").clone()
    }

    #[test]
    fn search_response_null_drinks_is_not_found() {
        let body: SearchResponse = serde_json::from_str(r#"{"drinks": null}"#).unwrap();
        assert!(body.drinks.is_none());
    }

    #[test]
    fn search_response_missing_drinks_is_not_found() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(body.drinks.is_none());
    }

    #[test]
    fn search_response_with_match_parses() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"drinks": [{"strDrink": "Negroni"}]}"#).unwrap();
        assert_eq!(body.drinks.unwrap().len(), 1);
    }

    #[test]
    fn map_drink_copies_scalar_fields_verbatim() {
        let drink = drink_object(json!({
            "strDrink": "Gin Tonic",
            "strInstructions": "Pour, stir, enjoy.",
            "strGlass": "Highball glass",
        }));
        let record = map_drink(&drink);
        assert_eq!(record.name, "Gin Tonic");
        assert_eq!(record.instructions, "Pour, stir, enjoy.");
        assert_eq!(record.glass, "Highball glass");
        assert!(record.ingredients.is_empty());
        assert!(record.image.is_none());
    }

    #[test]
    fn map_drink_keeps_populated_slots_in_source_order() {
        // Four populated slots, nothing beyond them.
        let drink = drink_object(json!({
            "strDrink": "Gin Tonic",
            "strIngredient1": "Gin", "strMeasure1": "4 cl",
            "strIngredient2": "Tonic water", "strMeasure2": "10 cl",
            "strIngredient3": "Ice", "strMeasure3": "cubes",
            "strIngredient4": "Lime", "strMeasure4": "1 wedge",
            "strIngredient5": null, "strMeasure5": null,
        }));
        let record = map_drink(&drink);
        assert_eq!(record.ingredients.len(), 4);
        assert_eq!(
            record
                .ingredients
                .iter()
                .map(|e| e.ingredient.as_str())
                .collect::<Vec<_>>(),
            vec!["Gin", "Tonic water", "Ice", "Lime"]
        );
        assert_eq!(record.ingredients[0].measure.as_deref(), Some("4 cl"));
    }

    #[test]
    fn map_drink_preserves_gaps_without_renumbering() {
        let drink = drink_object(json!({
            "strDrink": "Sparse",
            "strIngredient1": "Rum", "strMeasure1": "5 cl",
            "strIngredient2": null, "strMeasure2": null,
            "strIngredient3": "Mint", "strMeasure3": "6 leaves",
            "strIngredient7": "Soda", "strMeasure7": null,
        }));
        let record = map_drink(&drink);
        assert_eq!(
            record
                .ingredients
                .iter()
                .map(|e| e.ingredient.as_str())
                .collect::<Vec<_>>(),
            vec!["Rum", "Mint", "Soda"]
        );
        // Slot 7's null measure is carried, not dropped.
        assert_eq!(record.ingredients[2].measure, None);
    }

    #[test]
    fn map_drink_carries_null_measure_when_ingredient_present() {
        let drink = drink_object(json!({
            "strDrink": "Neat",
            "strIngredient1": "Whisky", "strMeasure1": null,
        }));
        let record = map_drink(&drink);
        assert_eq!(record.ingredients.len(), 1);
        assert_eq!(record.ingredients[0].measure, None);
    }

    #[test]
    fn map_drink_ignores_slots_past_fifteen() {
        let drink = drink_object(json!({
            "strDrink": "Overfull",
            "strIngredient15": "Bitters",
            "strIngredient16": "Should never appear",
        }));
        let record = map_drink(&drink);
        assert_eq!(record.ingredients.len(), 1);
        assert_eq!(record.ingredients[0].ingredient, "Bitters");
    }
}
