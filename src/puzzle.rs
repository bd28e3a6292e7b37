//! Einstein's fish riddle
//!
//! Five houses in a row, each with a different owner nationality, wall
//! colour, drink, cigarette brand and pet. The question is who owns the fish.

use std::sync::Arc;

use crate::{
    constraint::ConstraintSet,
    error::SearchError,
    grid::Schema,
    model::GridModel,
    perturb::ShuffleRow,
};

/// category holding the pets
pub const ANIMAL: &str = "animal";
/// category holding the cigarette brands
pub const CIGARETTE: &str = "cigarette";
/// category holding the nationalities
pub const NATIONALITY: &str = "nationality";
/// category holding the wall colours
pub const COLOUR: &str = "colour";
/// category holding the drinks
pub const DRINK: &str = "drink";

/// Schema of the riddle, one column per house
pub fn einstein_schema() -> Result<Arc<Schema>, SearchError> {
    let schema = Schema::new([
        (ANIMAL, ["bird", "dog", "cat", "horse", "fish"]),
        (
            CIGARETTE,
            ["pall mall", "dunhill", "blends", "prince", "blue master"],
        ),
        (
            NATIONALITY,
            ["british", "danish", "swedish", "norwegian", "german"],
        ),
        (COLOUR, ["yellow", "red", "white", "green", "blue"]),
        (DRINK, ["water", "tea", "milk", "coffee", "root beer"]),
    ])?;
    Ok(Arc::new(schema))
}

/// The fifteen clues of the riddle
pub fn einstein_constraints(schema: Arc<Schema>) -> Result<ConstraintSet, SearchError> {
    ConstraintSet::new(schema)
        .same_column((NATIONALITY, "british"), (COLOUR, "red"))?
        .same_column((NATIONALITY, "swedish"), (ANIMAL, "dog"))?
        .same_column((NATIONALITY, "danish"), (DRINK, "tea"))?
        .left_of((COLOUR, "green"), (COLOUR, "white"))?
        .same_column((COLOUR, "green"), (DRINK, "coffee"))?
        .same_column((CIGARETTE, "pall mall"), (ANIMAL, "bird"))?
        .same_column((COLOUR, "yellow"), (CIGARETTE, "dunhill"))?
        .at_column((DRINK, "milk"), 2)?
        .at_column((NATIONALITY, "norwegian"), 0)?
        .next_to((CIGARETTE, "blends"), (ANIMAL, "cat"))?
        .next_to((ANIMAL, "horse"), (CIGARETTE, "dunhill"))?
        .same_column((CIGARETTE, "blue master"), (DRINK, "root beer"))?
        .same_column((NATIONALITY, "german"), (CIGARETTE, "prince"))?
        .next_to((NATIONALITY, "norwegian"), (COLOUR, "blue"))?
        .next_to((CIGARETTE, "blends"), (DRINK, "water"))
}

/// Riddle model with the default row shuffle perturbation
pub fn einstein_model() -> Result<GridModel<ShuffleRow, ConstraintSet>, SearchError> {
    let constraints = einstein_constraints(einstein_schema()?)?;
    Ok(GridModel::new(ShuffleRow, constraints))
}
