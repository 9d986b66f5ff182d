use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{facility_availability, reserve_facility};
use crate::handler::facility::{
    register_facility, show_facility, show_facility_list, update_facility,
};

pub fn build_facility_routers() -> Router<AppRegistry> {
    let facility_routers = Router::new()
        .route("/", post(register_facility))
        .route("/", get(show_facility_list))
        .route("/:facility_id", get(show_facility))
        .route("/:facility_id", put(update_facility))
        .route("/:facility_id/bookings", post(reserve_facility))
        .route("/:facility_id/bookings", get(facility_availability));

    Router::new().nest("/facilities", facility_routers)
}
