//! End-to-end flow: admin onboards a cafe, the owner builds a menu and
//! opens the dashboard, a customer scans in, orders, and pays.

use tably::auth::{self, MockIdentityProvider, Role};
use tably::live::{AdminConsole, CustomerSession, OwnerDashboard, TrackedOrder};
use tably::session::EntryParams;
use tably::store::DocumentStore;
use tably::{analytics, functions, menu};

use shared::models::{CafeCreate, Customization, MenuItemCreate, OrderStatus, Selection};
use shared::ErrorCode;

async fn build_menu(store: &DocumentStore, cafe_id: &str) {
    for (name, price, category) in [
        ("Latte", 4.0, "Beverages"),
        ("Croissant", 3.5, "Food"),
    ] {
        menu::create_item(
            store,
            cafe_id,
            &MenuItemCreate {
                name: name.into(),
                description: String::new(),
                price,
                category: category.into(),
                available: true,
                modifiers: Vec::new(),
                image_url: None,
            },
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn full_table_service_flow() {
    let store = DocumentStore::new();
    let provider = MockIdentityProvider::new();

    // Admin onboards the cafe.
    let console = AdminConsole::open(&store);
    let cafe = console
        .onboard(&CafeCreate {
            name: "Demo Cafe".into(),
            address: "1 Bay St".into(),
            table_count: 4,
        })
        .await
        .unwrap();

    // Owner logs in with the generated credentials and builds the menu.
    let owner = auth::staff_login(&store, &provider, &cafe.owner_username, &cafe.owner_password)
        .await
        .unwrap();
    assert_eq!(
        owner.role,
        Role::Owner {
            cafe_id: cafe.id.clone()
        }
    );
    build_menu(&store, &cafe.id).await;
    let mut dashboard = OwnerDashboard::open(&store, &cafe.id);

    // Customer scans the T1 code and signs in anonymously.
    let entry =
        EntryParams::from_query(&format!("?cafeId={}&tableId=T1", cafe.id)).unwrap();
    let customer = auth::customer_login(&provider).await.unwrap();
    assert_eq!(customer.role, Role::Customer);
    let mut session = CustomerSession::open(&store, &entry.cafe_id, &entry.table_id);

    // Two lattes plus a customized croissant: 4.00*2 + 4.25 = 12.25.
    let items = session.menu();
    assert_eq!(items.len(), 2);
    let latte = items.iter().find(|i| i.name == "Latte").unwrap().clone();
    let croissant = items.iter().find(|i| i.name == "Croissant").unwrap().clone();
    session.with_cart(|cart| {
        cart.add_simple(&latte);
        cart.add_simple(&latte);
        cart.add_customized(
            &croissant,
            vec![Customization {
                modifier_name: "Filling".into(),
                selection: Selection::Single("Almond".into()),
                price_adjustment: 0.75,
            }],
            Some("warm please"),
        );
        assert_eq!(cart.total(), 12.25);
    });

    let order = session.place_order().await.unwrap();
    assert_eq!(order.total, 12.25);
    assert_eq!(order.status, OrderStatus::Pending);

    // Dashboard sees the ticket and the occupied table.
    dashboard.orders_changed().await.unwrap();
    let queue = dashboard.active_orders();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, order.id);
    while dashboard.cafe().unwrap().table("T1").unwrap().is_vacant() {
        dashboard.cafe_changed().await.unwrap();
    }

    // Customer follows the progress strip.
    let tracked = session.order_changed().await.unwrap();
    assert!(matches!(tracked, TrackedOrder::Active(_)));

    dashboard
        .advance(&order.id, OrderStatus::Preparing)
        .await
        .unwrap();
    let tracked = session.order_changed().await.unwrap();
    assert_eq!(tracked.order().unwrap().status, OrderStatus::Preparing);

    dashboard
        .advance(&order.id, OrderStatus::ReadyForDelivery)
        .await
        .unwrap();
    session.order_changed().await.unwrap();

    // Payment: queue drains, table vacates, customer sees the completed
    // order exactly once.
    dashboard.advance(&order.id, OrderStatus::Paid).await.unwrap();
    // The two intermediate advances were not consumed on this watch, so
    // deliveries may still be in flight; wait for the queue to drain.
    while !dashboard.active_orders().is_empty() {
        dashboard.orders_changed().await.unwrap();
    }
    while !dashboard.cafe().unwrap().table("T1").unwrap().is_vacant() {
        dashboard.cafe_changed().await.unwrap();
    }

    let tracked = session.order_changed().await.unwrap();
    assert!(matches!(tracked, TrackedOrder::Complete(_)));
    assert!(tracked.order().unwrap().paid_at.is_some());

    // A newcomer at the same table starts from a clean screen.
    let newcomer = CustomerSession::open(&store, &cafe.id, "T1");
    assert_eq!(newcomer.tracked_order(), TrackedOrder::None);

    // The paid order feeds the owner's analytics.
    let summary = analytics::sales_summary(&store, &cafe.id).await;
    assert_eq!(summary.order_count, 1);
    assert_eq!(summary.revenue, 12.25);
    assert_eq!(summary.top_items[0].name, "Latte");
    assert_eq!(summary.top_items[0].quantity, 2);
}

#[tokio::test]
async fn service_request_reaches_the_dashboard() {
    let store = DocumentStore::new();
    let console = AdminConsole::open(&store);
    let cafe = console
        .onboard(&CafeCreate {
            name: "Demo Cafe".into(),
            address: "1 Bay St".into(),
            table_count: 2,
        })
        .await
        .unwrap();

    let mut dashboard = OwnerDashboard::open(&store, &cafe.id);
    let session = CustomerSession::open(&store, &cafe.id, "T2");

    let request = session.call_server().await.unwrap();
    dashboard.requests_changed().await.unwrap();
    let pending = dashboard.pending_requests();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].table_id, "T2");

    dashboard.acknowledge(&request.id).await.unwrap();
    dashboard.requests_changed().await.unwrap();
    assert!(dashboard.pending_requests().is_empty());
}

#[tokio::test]
async fn owner_purges_history_after_linking() {
    let store = DocumentStore::new();
    let provider = MockIdentityProvider::new();
    let console = AdminConsole::open(&store);
    let cafe = console
        .onboard(&CafeCreate {
            name: "Demo Cafe".into(),
            address: "1 Bay St".into(),
            table_count: 2,
        })
        .await
        .unwrap();

    // Old history, stamped well before the retention window.
    store
        .add(
            shared::models::collections::ORDERS,
            serde_json::json!({
                "cafeId": cafe.id,
                "createdAt": "2020-06-01T00:00:00.000000Z"
            }),
        )
        .await
        .unwrap();

    // An unlinked cafe has no owner uid to authorize against.
    let err = functions::purge_old_data(&store, "someone", &cafe.id, 30, 100)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotCafeOwner);

    let owner = auth::staff_login(&store, &provider, &cafe.owner_username, &cafe.owner_password)
        .await
        .unwrap();
    let outcome =
        functions::purge_old_data(&store, &owner.session.user.uid, &cafe.id, 30, 100)
            .await
            .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.deleted_count, 1);
}
