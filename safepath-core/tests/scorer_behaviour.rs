use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use safepath_core::test_support::sample_route;
use safepath_core::{Route, RouteScorer, SafetyLevel, SafetyRating, SyntheticScorer};

#[fixture]
fn route() -> RefCell<Option<Route>> {
    RefCell::new(None)
}

#[fixture]
fn ratings() -> RefCell<Vec<SafetyRating>> {
    RefCell::new(Vec::new())
}

#[given("a route of 2000 metres with 20 points")]
fn given_route(#[from(route)] route: &RefCell<Option<Route>>) {
    *route.borrow_mut() = Some(sample_route(2_000.0, 20));
}

fn score_once(route: &RefCell<Option<Route>>, ratings: &RefCell<Vec<SafetyRating>>) {
    let route = route.borrow();
    let route = route.as_ref().expect("route must be given");
    ratings.borrow_mut().push(SyntheticScorer.score(route));
}

#[when("I score the route")]
fn when_score(
    #[from(route)] route: &RefCell<Option<Route>>,
    #[from(ratings)] ratings: &RefCell<Vec<SafetyRating>>,
) {
    score_once(route, ratings);
}

#[when("I score the route twice")]
fn when_score_twice(
    #[from(route)] route: &RefCell<Option<Route>>,
    #[from(ratings)] ratings: &RefCell<Vec<SafetyRating>>,
) {
    score_once(route, ratings);
    score_once(route, ratings);
}

#[then("the score is 70")]
fn then_score(#[from(ratings)] ratings: &RefCell<Vec<SafetyRating>>) {
    let ratings = ratings.borrow();
    assert_eq!(ratings.first().map(SafetyRating::score), Some(70));
}

#[then("the level is moderate with colour \"#FFC107\"")]
fn then_level(#[from(ratings)] ratings: &RefCell<Vec<SafetyRating>>) {
    let ratings = ratings.borrow();
    let rating = ratings.first().expect("route must be scored");
    assert_eq!(rating.level(), SafetyLevel::Moderate);
    assert_eq!(rating.color(), "#FFC107");
}

#[then("both ratings are identical")]
fn then_identical(#[from(ratings)] ratings: &RefCell<Vec<SafetyRating>>) {
    let ratings = ratings.borrow();
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0], ratings[1]);
}

#[scenario(path = "tests/features/scorer.feature", index = 0)]
fn moderate_route(route: RefCell<Option<Route>>, ratings: RefCell<Vec<SafetyRating>>) {
    let _ = (route, ratings);
}

#[scenario(path = "tests/features/scorer.feature", index = 1)]
fn deterministic_scoring(route: RefCell<Option<Route>>, ratings: RefCell<Vec<SafetyRating>>) {
    let _ = (route, ratings);
}
