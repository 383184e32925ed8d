use crate::{
    success,
    types::{Order, TvShowDraft},
    utils,
};

use super::{open_session, print_shows, report, require_signed_in};

pub async fn list(order: Order) {
    let controller = open_session().await;
    require_signed_in(&controller.snapshot());

    let pb = utils::spinner(&format!("Fetching shows by {}...", order));
    controller.fetch_list(order).await;
    pb.finish_and_clear();

    let state = controller.snapshot();
    report(&state);
    print_shows(&state);
}

pub async fn show(id: i64) {
    let controller = open_session().await;
    require_signed_in(&controller.snapshot());

    let pb = utils::spinner(&format!("Fetching show {}...", id));
    let item = controller.fetch_item(id).await;
    pb.finish_and_clear();

    report(&controller.snapshot());
    if let Some(item) = item {
        println!("{}", utils::shows_table(std::slice::from_ref(&item)));
    }
}

pub async fn insert(name: String, rate: i64) {
    let controller = open_session().await;
    require_signed_in(&controller.snapshot());

    let pb = utils::spinner(&format!("Adding {}...", name));
    controller.insert(TvShowDraft::new(name.clone(), rate)).await;
    pb.finish_and_clear();

    let state = controller.snapshot();
    report(&state);
    success!("Added {}", name);
    print_shows(&state);
}
