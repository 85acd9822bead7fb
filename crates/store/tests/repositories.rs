//! Integration tests for the in-memory repositories.

use chrono::{Duration, Utc};
use common::Version;
use domain::{
    Category, Customer, Email, Entity, LineItem, Money, Order, OrderParts, OrderStatus, Payment,
    PaymentMethod, PaymentStatus, Product, TaxId,
};
use rust_decimal_macros::dec;
use store::{
    CustomerRepository, InMemoryCustomerRepository, InMemoryOrderRepository,
    InMemoryPaymentRepository, InMemoryProductRepository, OrderRepository, PaymentRepository,
    ProductRepository, StoreError,
};

fn customer(name: &str, email: &str) -> Customer {
    Customer::new(name, None, Email::parse(email).unwrap(), None, false).unwrap()
}

fn burger() -> Product {
    Product::new("X-Burger", None, dec!(19.99), Category::Snack).unwrap()
}

fn order_for(buyer: &Customer, product: &Product) -> Order {
    Order::place(buyer, vec![LineItem::new(product, 1, None).unwrap()]).unwrap()
}

/// Rebuilds `order` with a given status and creation time.
fn backdated(order: &Order, status: OrderStatus, minutes_ago: i64) -> Order {
    let created = Utc::now() - Duration::minutes(minutes_ago);
    Order::restore(OrderParts {
        id: order.id(),
        version: Version::initial(),
        customer: order.customer().clone(),
        items: order.items().to_vec(),
        status,
        created_at: created,
        updated_at: created,
        preparation_started_at: None,
        ready_at: None,
        finalized_at: None,
    })
    .unwrap()
}

mod versioning {
    use super::*;

    #[tokio::test]
    async fn save_bumps_version() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(burger()).await.unwrap();
        assert_eq!(saved.version(), Version::new(1));

        let saved = repo.save(saved).await.unwrap();
        assert_eq!(saved.version(), Version::new(2));
    }

    #[tokio::test]
    async fn stale_save_is_rejected() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(burger()).await.unwrap();

        let mut first = saved.clone();
        let mut second = saved;
        first.deactivate();
        repo.save(first).await.unwrap();

        second
            .update("X-Bacon", None, dec!(22.00), Category::Snack)
            .unwrap();
        let err = repo.save(second).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::ConcurrencyConflict {
                entity: "Product",
                ..
            }
        ));

        let stored = repo.find_by_id(saved_id(&repo).await).await.unwrap().unwrap();
        assert_eq!(stored.name(), "X-Burger");
        assert!(!stored.is_available());
    }

    async fn saved_id(repo: &InMemoryProductRepository) -> common::ProductId {
        repo.find_all().await.unwrap()[0].id()
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryCustomerRepository::new();
        let other = repo.clone();
        repo.save(customer("Ana", "ana@example.com")).await.unwrap();
        assert_eq!(other.count().await.unwrap(), 1);
    }
}

mod products {
    use super::*;

    #[tokio::test]
    async fn queries_by_category_availability_and_name() {
        let repo = InMemoryProductRepository::new();
        repo.save(burger()).await.unwrap();
        let mut soda = Product::new("Soda", None, dec!(5.00), Category::Drink).unwrap();
        soda.deactivate();
        repo.save(soda).await.unwrap();
        repo.save(Product::new("Juice", None, dec!(7.00), Category::Drink).unwrap())
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 3);
        assert_eq!(repo.count_available().await.unwrap(), 2);
        assert_eq!(repo.count_by_category(Category::Drink).await.unwrap(), 2);
        assert_eq!(
            repo.find_available_by_category(Category::Drink)
                .await
                .unwrap()
                .len(),
            1
        );
        let found = repo.search_by_name("BURG").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "X-Burger");

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, ["X-Burger", "Soda", "Juice"]);
    }

    #[tokio::test]
    async fn name_existence_is_case_insensitive() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(burger()).await.unwrap();
        assert!(repo.exists_by_name(" x-burger ").await.unwrap());
        assert!(
            !repo
                .exists_by_name_excluding("X-BURGER", saved.id())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn delete_reports_missing() {
        let repo = InMemoryProductRepository::new();
        let saved = repo.save(burger()).await.unwrap();
        assert!(repo.delete(saved.id()).await.unwrap());
        assert!(!repo.delete(saved.id()).await.unwrap());
        assert!(repo.find_by_id(saved.id()).await.unwrap().is_none());
    }
}

mod customers {
    use super::*;

    #[tokio::test]
    async fn find_by_email_and_tax_id() {
        let repo = InMemoryCustomerRepository::new();
        let tax_id = TaxId::parse("52998224725").unwrap();
        let ana = Customer::new(
            "Ana Souza",
            Some(tax_id.clone()),
            Email::parse("ana@example.com").unwrap(),
            None,
            true,
        )
        .unwrap();
        repo.save(ana.clone()).await.unwrap();
        repo.save(customer("Bruno", "bruno@example.com"))
            .await
            .unwrap();

        let by_email = repo
            .find_by_email(&Email::parse("ANA@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id(), ana.id());

        let by_tax = repo.find_by_tax_id(&tax_id).await.unwrap().unwrap();
        assert_eq!(by_tax.id(), ana.id());

        assert!(repo.exists_by_tax_id(&tax_id).await.unwrap());
        assert!(
            !repo
                .exists_by_email(&Email::parse("nobody@example.com").unwrap())
                .await
                .unwrap()
        );
        assert_eq!(repo.search_by_name("sou").await.unwrap().len(), 1);
    }
}

mod orders {
    use super::*;

    #[tokio::test]
    async fn kitchen_order_is_priority_then_fifo() {
        let repo = InMemoryOrderRepository::new();
        let buyer = customer("Ana", "ana@example.com");
        let product = burger();

        let received_old = backdated(&order_for(&buyer, &product), OrderStatus::Received, 30);
        let preparing = backdated(&order_for(&buyer, &product), OrderStatus::InPreparation, 20);
        let ready_new = backdated(&order_for(&buyer, &product), OrderStatus::Ready, 5);
        let ready_old = backdated(&order_for(&buyer, &product), OrderStatus::Ready, 10);
        let finalized = backdated(&order_for(&buyer, &product), OrderStatus::Finalized, 40);

        for order in [&received_old, &preparing, &ready_new, &ready_old, &finalized] {
            repo.save(order.clone()).await.unwrap();
        }

        let ids: Vec<_> = repo
            .find_for_kitchen()
            .await
            .unwrap()
            .iter()
            .map(|o| o.id())
            .collect();
        assert_eq!(
            ids,
            [ready_old.id(), ready_new.id(), preparing.id(), received_old.id()]
        );

        assert_eq!(repo.find_active().await.unwrap().len(), 4);
        assert_eq!(
            repo.count_by_status(OrderStatus::Ready).await.unwrap(),
            2
        );
        assert_eq!(
            repo.find_by_customer(buyer.id()).await.unwrap().len(),
            5
        );
    }

    #[tokio::test]
    async fn created_between_is_inclusive_window() {
        let repo = InMemoryOrderRepository::new();
        let buyer = customer("Ana", "ana@example.com");
        let product = burger();
        let old = backdated(&order_for(&buyer, &product), OrderStatus::Received, 120);
        let recent = backdated(&order_for(&buyer, &product), OrderStatus::Received, 5);
        repo.save(old).await.unwrap();
        repo.save(recent.clone()).await.unwrap();

        let window = repo
            .find_created_between(Utc::now() - Duration::minutes(60), Utc::now())
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].id(), recent.id());
    }

    #[tokio::test]
    async fn finalized_orders_still_reference_their_products() {
        let repo = InMemoryOrderRepository::new();
        let buyer = customer("Ana", "ana@example.com");
        let ordered = burger();
        let never_ordered = Product::new("Soda", None, dec!(6.00), Category::Drink).unwrap();
        repo.save(backdated(&order_for(&buyer, &ordered), OrderStatus::Finalized, 90))
            .await
            .unwrap();

        assert!(repo.exists_with_product(ordered.id()).await.unwrap());
        assert!(!repo.exists_with_product(never_ordered.id()).await.unwrap());
    }
}

mod payments {
    use super::*;

    #[tokio::test]
    async fn find_by_order_and_transaction() {
        let repo = InMemoryPaymentRepository::new();
        let buyer = customer("Ana", "ana@example.com");
        let order = order_for(&buyer, &burger());

        let mut payment =
            Payment::new(order.id(), PaymentMethod::Pix, Money::new(dec!(19.99))).unwrap();
        payment.start_processing(Some("TX-0001")).unwrap();
        let payment = repo.save(payment).await.unwrap();
        repo.save(
            Payment::new(
                order_for(&buyer, &burger()).id(),
                PaymentMethod::Cash,
                Money::new(dec!(5.00)),
            )
            .unwrap(),
        )
        .await
        .unwrap();

        let by_order = repo.find_by_order(order.id()).await.unwrap().unwrap();
        assert_eq!(by_order.id(), payment.id());
        let by_tx = repo
            .find_by_transaction_id("TX-0001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_tx.id(), payment.id());
        assert!(repo.find_by_transaction_id("TX-9999").await.unwrap().is_none());

        assert_eq!(
            repo.count_by_status(PaymentStatus::Processing).await.unwrap(),
            1
        );
        assert_eq!(
            repo.find_by_method(PaymentMethod::Cash).await.unwrap().len(),
            1
        );
    }
}
