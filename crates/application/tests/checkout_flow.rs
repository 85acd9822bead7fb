//! End-to-end tests of the application services over in-memory adapters.

use std::sync::Arc;

use application::ports::{DEFAULT_LINK_BASE, sign_webhook};
use application::{
    AppServices, CheckoutCustomer, CheckoutItem, CheckoutReceipt, CheckoutRequest, CustomerUpdate,
    Dependencies, GatewayWebhook, InMemoryPaymentGateway, NewCustomer, Notification,
    PaymentGateway, ProductInput, RecordingNotifier, ServiceError,
};
use common::ProductId;
use domain::{Category, DomainError, Entity, OrderStatus, PaymentMethod, PaymentStatus, Product};
use rust_decimal_macros::dec;

struct Harness {
    services: AppServices,
    gateway: InMemoryPaymentGateway,
    notifier: RecordingNotifier,
}

fn harness_with(gateway: InMemoryPaymentGateway) -> Harness {
    let notifier = RecordingNotifier::new();
    let deps = Dependencies::in_memory(Arc::new(gateway.clone()), Arc::new(notifier.clone()));
    Harness {
        services: AppServices::new(deps),
        gateway,
        notifier,
    }
}

fn harness() -> Harness {
    harness_with(InMemoryPaymentGateway::default())
}

async fn add_product(h: &Harness, name: &str, price: rust_decimal::Decimal) -> Product {
    h.services
        .catalog
        .create(ProductInput {
            name: name.to_string(),
            description: None,
            price,
            category: Category::Snack,
        })
        .await
        .unwrap()
}

fn buyer(email: &str) -> CheckoutCustomer {
    CheckoutCustomer {
        name: "Ana Souza".to_string(),
        tax_id: None,
        email: email.to_string(),
    }
}

fn cart(items: &[(ProductId, u32)], method: &str) -> CheckoutRequest {
    CheckoutRequest {
        customer: buyer("ana@example.com"),
        items: items
            .iter()
            .map(|&(product_id, quantity)| CheckoutItem {
                product_id,
                quantity,
                notes: None,
            })
            .collect(),
        payment_method: method.to_string(),
    }
}

/// Places a one-burger order paid with `method`.
async fn place(h: &Harness, method: &str) -> CheckoutReceipt {
    let product = match h.services.catalog.search("X-Burger").await.unwrap().pop() {
        Some(product) => product,
        None => add_product(h, "X-Burger", dec!(19.99)).await,
    };
    h.services
        .checkout
        .checkout(cart(&[(product.id(), 1)], method))
        .await
        .unwrap()
}

fn webhook(transaction_id: &str, status: &str) -> GatewayWebhook {
    GatewayWebhook {
        transaction_id: transaction_id.to_string(),
        status: status.to_string(),
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn duplicate_names_conflict_case_insensitively() {
        let h = harness();
        add_product(&h, "X-Burger", dec!(19.99)).await;

        let err = h
            .services
            .catalog
            .create(ProductInput {
                name: "  x-burger ".to_string(),
                description: None,
                price: dec!(10.00),
                category: Category::Snack,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_cannot_take_another_products_name() {
        let h = harness();
        add_product(&h, "X-Burger", dec!(19.99)).await;
        let fries = add_product(&h, "Fries", dec!(8.50)).await;

        let rename = |name: &str| ProductInput {
            name: name.to_string(),
            description: Some("Crispy".to_string()),
            price: dec!(9.00),
            category: Category::Side,
        };

        let err = h
            .services
            .catalog
            .update(fries.id(), rename("X-BURGER"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));

        let updated = h
            .services
            .catalog
            .update(fries.id(), rename("Fries"))
            .await
            .unwrap();
        assert_eq!(updated.category(), Category::Side);
        assert_eq!(updated.description(), Some("Crispy"));
    }

    #[tokio::test]
    async fn availability_drives_listings() {
        let h = harness();
        let burger = add_product(&h, "X-Burger", dec!(19.99)).await;

        assert_eq!(
            h.services.catalog.categories_with_products().await.unwrap(),
            vec![Category::Snack]
        );

        h.services.catalog.deactivate(burger.id()).await.unwrap();
        assert!(h.services.catalog.list_available(None).await.unwrap().is_empty());
        assert!(
            h.services
                .catalog
                .categories_with_products()
                .await
                .unwrap()
                .is_empty()
        );

        h.services.catalog.activate(burger.id()).await.unwrap();
        assert_eq!(
            h.services
                .catalog
                .list_available(Some(Category::Snack))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn deleting_a_missing_product_is_not_found() {
        let h = harness();
        let err = h.services.catalog.delete(ProductId::new()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn ordered_product_cannot_be_deleted() {
        let h = harness();
        let receipt = place(&h, "CASH").await;
        let order = h.services.orders.get(receipt.order_id).await.unwrap();
        let product_id = order.items()[0].product_id();

        let err = h.services.catalog.delete(product_id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::IllegalOperation(_))
        ));
        assert!(h.services.catalog.get(product_id).await.is_ok());

        let deactivated = h.services.catalog.deactivate(product_id).await.unwrap();
        assert!(!deactivated.is_available());

        let unused = add_product(&h, "Onion Rings", dec!(12.00)).await;
        h.services.catalog.delete(unused.id()).await.unwrap();
        assert!(h.services.catalog.get(unused.id()).await.is_err());
    }

    #[tokio::test]
    async fn statistics_count_units_sold() {
        let h = harness();
        let product = add_product(&h, "X-Burger", dec!(10.00)).await;
        h.services
            .checkout
            .checkout(cart(&[(product.id(), 3)], "CASH"))
            .await
            .unwrap();

        let stats = h.services.catalog.category_statistics().await.unwrap();
        let snacks = stats
            .iter()
            .find(|s| s.category == Category::Snack)
            .unwrap();
        assert_eq!(snacks.units_sold, 3);
        assert_eq!(snacks.revenue.amount(), dec!(30.00));
    }
}

mod customers {
    use super::*;

    fn registration(email: &str, tax_id: Option<&str>) -> NewCustomer {
        NewCustomer {
            name: "Bruno Lima".to_string(),
            tax_id: tax_id.map(String::from),
            email: email.to_string(),
            phone: None,
            accepts_marketing: true,
        }
    }

    #[tokio::test]
    async fn duplicate_email_or_tax_id_conflicts() {
        let h = harness();
        h.services
            .customers
            .register(registration("bruno@example.com", Some("529.982.247-25")))
            .await
            .unwrap();

        let same_email = h
            .services
            .customers
            .register(registration("BRUNO@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(
            same_email,
            ServiceError::Domain(DomainError::Conflict(_))
        ));

        let same_tax_id = h
            .services
            .customers
            .register(registration("other@example.com", Some("52998224725")))
            .await
            .unwrap_err();
        assert!(matches!(
            same_tax_id,
            ServiceError::Domain(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn lookups_normalize_input() {
        let h = harness();
        let customer = h
            .services
            .customers
            .register(registration("bruno@example.com", Some("52998224725")))
            .await
            .unwrap();

        let by_tax = h
            .services
            .customers
            .get_by_tax_id("529.982.247-25")
            .await
            .unwrap();
        assert_eq!(by_tax.id(), customer.id());

        let by_email = h
            .services
            .customers
            .get_by_email(" Bruno@Example.com ")
            .await
            .unwrap();
        assert_eq!(by_email.id(), customer.id());
    }

    #[tokio::test]
    async fn update_rejects_an_email_in_use() {
        let h = harness();
        h.services
            .customers
            .register(registration("first@example.com", None))
            .await
            .unwrap();
        let second = h
            .services
            .customers
            .register(registration("second@example.com", None))
            .await
            .unwrap();

        let err = h
            .services
            .customers
            .update(
                second.id(),
                CustomerUpdate {
                    name: "Second".to_string(),
                    email: "first@example.com".to_string(),
                    phone: None,
                    accepts_marketing: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn campaign_audience_follows_enabled_flag() {
        let h = harness();
        let customer = h
            .services
            .customers
            .register(registration("bruno@example.com", None))
            .await
            .unwrap();
        assert_eq!(h.services.customers.campaign_audience().await.unwrap().len(), 1);

        h.services.customers.disable(customer.id()).await.unwrap();
        assert!(h.services.customers.campaign_audience().await.unwrap().is_empty());

        let stats = h.services.customers.statistics().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.campaign_eligible, 0);
    }
}

mod checkout {
    use super::*;

    #[tokio::test]
    async fn pix_checkout_charges_the_gateway() {
        let h = harness();
        let burger = add_product(&h, "X-Burger", dec!(10.00)).await;
        let soda = add_product(&h, "Soda", dec!(5.00)).await;

        let receipt = h
            .services
            .checkout
            .checkout(cart(&[(burger.id(), 2), (soda.id(), 1)], "pix"))
            .await
            .unwrap();

        assert_eq!(receipt.status, OrderStatus::Received);
        assert_eq!(receipt.total.amount(), dec!(25.00));
        assert_eq!(receipt.payment_method, PaymentMethod::Pix);
        assert_eq!(receipt.payment_status, PaymentStatus::Processing);
        assert_eq!(receipt.transaction_id.as_deref(), Some("TX-0001"));
        assert!(receipt.qr_code.is_some());
        assert!(receipt.payment_link.is_none());

        let payment = h.services.payments.get_by_order(receipt.order_id).await.unwrap();
        assert_eq!(payment.value(), receipt.total);
        assert_eq!(
            h.notifier.sent().await,
            vec![Notification::KitchenNewOrder {
                order_id: receipt.order_id
            }]
        );
    }

    #[tokio::test]
    async fn card_checkout_returns_a_payment_link() {
        let h = harness();
        let receipt = place(&h, "DEBIT_CARD").await;
        assert_eq!(
            receipt.payment_link,
            Some(format!("{DEFAULT_LINK_BASE}/TX-0001"))
        );
    }

    #[tokio::test]
    async fn cash_skips_the_gateway() {
        let h = harness();
        let receipt = place(&h, "CASH").await;
        assert_eq!(receipt.payment_status, PaymentStatus::Pending);
        assert!(receipt.transaction_id.is_none());
        assert_eq!(h.gateway.charge_count().await, 0);
    }

    #[tokio::test]
    async fn gateway_outage_leaves_payment_pending() {
        let h = harness();
        h.gateway.set_unavailable(true).await;

        let receipt = place(&h, "PIX").await;
        assert_eq!(receipt.payment_status, PaymentStatus::Pending);
        assert!(receipt.transaction_id.is_none());
        assert!(receipt.message.contains("unavailable"));
        assert!(h.services.orders.get(receipt.order_id).await.is_ok());
    }

    #[tokio::test]
    async fn returning_customer_is_matched_by_email() {
        let h = harness();
        place(&h, "CASH").await;
        place(&h, "CASH").await;

        let customers = h.services.customers.list().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].total_orders(), 2);
        assert_eq!(h.services.customers.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn returning_customer_is_matched_by_tax_id() {
        let h = harness();
        let product = add_product(&h, "X-Burger", dec!(19.99)).await;
        let mut request = cart(&[(product.id(), 1)], "CASH");
        request.customer.tax_id = Some("529.982.247-25".to_string());
        h.services.checkout.checkout(request.clone()).await.unwrap();

        request.customer.email = "new-address@example.com".to_string();
        h.services.checkout.checkout(request).await.unwrap();

        let customers = h.services.customers.list().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].total_orders(), 2);
    }

    #[tokio::test]
    async fn unknown_and_unavailable_products_fail() {
        let h = harness();
        let missing = h
            .services
            .checkout
            .checkout(cart(&[(ProductId::new(), 1)], "PIX"))
            .await
            .unwrap_err();
        assert!(matches!(
            missing,
            ServiceError::Domain(DomainError::NotFound { .. })
        ));

        let product = add_product(&h, "X-Burger", dec!(19.99)).await;
        h.services.catalog.deactivate(product.id()).await.unwrap();
        let unavailable = h
            .services
            .checkout
            .checkout(cart(&[(product.id(), 1)], "PIX"))
            .await
            .unwrap_err();
        assert!(matches!(
            unavailable,
            ServiceError::Domain(DomainError::IllegalOperation(_))
        ));
        assert!(h.services.orders.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_payment_method_is_a_validation_error() {
        let h = harness();
        let product = add_product(&h, "X-Burger", dec!(19.99)).await;
        let err = h
            .services
            .checkout
            .checkout(cart(&[(product.id(), 1)], "VOUCHER"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Validation(_))
        ));
    }
}

mod kitchen {
    use super::*;

    #[tokio::test]
    async fn orders_move_through_the_kitchen() {
        let h = harness();
        let receipt = place(&h, "CASH").await;
        let id = receipt.order_id;

        h.services.orders.start_preparation(id).await.unwrap();
        h.services.orders.mark_ready(id).await.unwrap();
        let order = h.services.orders.finalize(id).await.unwrap();

        assert_eq!(order.status(), OrderStatus::Finalized);
        assert!(order.finalized_at().is_some());

        let sent = h.notifier.sent().await;
        assert!(sent.contains(&Notification::OrderReady { order_id: id }));
        assert!(sent.contains(&Notification::OrderStatusChanged {
            order_id: id,
            from: OrderStatus::Ready,
            to: OrderStatus::Finalized,
        }));
    }

    #[tokio::test]
    async fn skipping_a_stage_is_an_invalid_transition() {
        let h = harness();
        let receipt = place(&h, "CASH").await;

        let err = h
            .services
            .orders
            .update_status(receipt.order_id, "ready")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidTransition { .. })
        ));

        let bogus = h
            .services
            .orders
            .update_status(receipt.order_id, "cooking")
            .await
            .unwrap_err();
        assert!(matches!(
            bogus,
            ServiceError::Domain(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn queue_puts_ready_orders_first() {
        let h = harness();
        let first = place(&h, "CASH").await.order_id;
        let second = place(&h, "CASH").await.order_id;
        let third = place(&h, "CASH").await.order_id;
        let done = place(&h, "CASH").await.order_id;

        h.services.orders.update_status(second, "IN_PREPARATION").await.unwrap();
        h.services.orders.start_preparation(third).await.unwrap();
        h.services.orders.mark_ready(third).await.unwrap();
        for step in ["IN_PREPARATION", "READY", "FINALIZED"] {
            h.services.orders.update_status(done, step).await.unwrap();
        }

        let queue = h.services.orders.kitchen_queue().await.unwrap();
        let ids: Vec<_> = queue.iter().map(|t| t.order_id).collect();
        assert_eq!(ids, vec![third, second, first]);
        assert_eq!(h.services.orders.list_active().await.unwrap().len(), 3);
        assert_eq!(
            h.services
                .orders
                .list_by_status("finalized")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn items_change_only_while_received() {
        let h = harness();
        let receipt = place(&h, "CASH").await;
        let fries = add_product(&h, "Fries", dec!(7.50)).await;

        let order = h
            .services
            .orders
            .add_item(receipt.order_id, fries.id(), 2, Some("no salt".to_string()))
            .await
            .unwrap();
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.total().amount(), dec!(34.99));

        let fries_line = order.items()[1].id();
        let order = h
            .services
            .orders
            .remove_item(receipt.order_id, fries_line)
            .await
            .unwrap();
        assert_eq!(order.total().amount(), dec!(19.99));

        h.services
            .orders
            .start_preparation(receipt.order_id)
            .await
            .unwrap();
        let err = h
            .services
            .orders
            .add_item(receipt.order_id, fries.id(), 1, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::IllegalOperation(_))
        ));
    }

    #[tokio::test]
    async fn failing_notifications_do_not_block_transitions() {
        let h = harness();
        let receipt = place(&h, "CASH").await;
        h.notifier.set_failing(true).await;

        let order = h
            .services
            .orders
            .start_preparation(receipt.order_id)
            .await
            .unwrap();
        assert_eq!(order.status(), OrderStatus::InPreparation);
    }

    #[tokio::test]
    async fn wait_time_starts_normal() {
        let h = harness();
        let receipt = place(&h, "CASH").await;
        let report = h.services.orders.wait_time(receipt.order_id).await.unwrap();
        assert_eq!(report.total_minutes, 0);
        assert!(!report.is_high);
    }
}

mod webhook {
    use super::*;

    #[tokio::test]
    async fn approval_starts_the_order() {
        let h = harness();
        let receipt = place(&h, "PIX").await;
        let tx = receipt.transaction_id.clone().unwrap();

        let payment = h
            .services
            .payments
            .handle_webhook(&webhook(&tx, "approved"), "{}", None)
            .await
            .unwrap();
        assert_eq!(payment.status(), PaymentStatus::Approved);
        assert!(payment.processed_at().is_some());

        let order = h.services.orders.get(receipt.order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::InPreparation);

        let sent = h.notifier.sent().await;
        assert!(sent.contains(&Notification::PaymentApproved {
            payment_id: payment.id(),
            order_id: receipt.order_id,
        }));
        assert!(sent.contains(&Notification::OrderStatusChanged {
            order_id: receipt.order_id,
            from: OrderStatus::Received,
            to: OrderStatus::InPreparation,
        }));
    }

    #[tokio::test]
    async fn repeated_approval_is_an_invalid_transition() {
        let h = harness();
        let tx = place(&h, "PIX").await.transaction_id.unwrap();
        let approved = webhook(&tx, "approved");

        h.services
            .payments
            .handle_webhook(&approved, "{}", None)
            .await
            .unwrap();
        let err = h
            .services
            .payments
            .handle_webhook(&approved, "{}", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn in_process_reports_change_nothing() {
        let h = harness();
        let tx = place(&h, "PIX").await.transaction_id.unwrap();

        for status in ["in_process", "pending", "something-new"] {
            let payment = h
                .services
                .payments
                .handle_webhook(&webhook(&tx, status), "{}", None)
                .await
                .unwrap();
            assert_eq!(payment.status(), PaymentStatus::Processing);
        }
    }

    #[tokio::test]
    async fn rejection_notifies_and_keeps_order_received() {
        let h = harness();
        let receipt = place(&h, "CREDIT_CARD").await;
        let tx = receipt.transaction_id.unwrap();

        let payment = h
            .services
            .payments
            .handle_webhook(&webhook(&tx, "cancelled"), "{}", None)
            .await
            .unwrap();
        assert_eq!(payment.status(), PaymentStatus::Rejected);
        assert_eq!(payment.reason(), Some("Gateway reported 'cancelled'"));

        let order = h.services.orders.get(receipt.order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Received);
        assert!(h.notifier.sent().await.contains(&Notification::PaymentRejected {
            payment_id: payment.id(),
            order_id: receipt.order_id,
        }));
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let h = harness();
        let err = h
            .services
            .payments
            .handle_webhook(&webhook("TX-9999", "approved"), "{}", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn signature_is_checked_when_a_secret_is_set() {
        let h = harness_with(InMemoryPaymentGateway::new(
            DEFAULT_LINK_BASE,
            Some("s3cret".to_string()),
        ));
        let tx = place(&h, "PIX").await.transaction_id.unwrap();
        let payload = format!(r#"{{"transactionId":"{tx}","status":"approved"}}"#);
        let signed_other = sign_webhook("s3cret", r#"{"status":"rejected"}"#);

        for forged in [None, Some("s3cret"), Some(signed_other.as_str())] {
            let err = h
                .services
                .payments
                .handle_webhook(&webhook(&tx, "approved"), &payload, forged)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Domain(DomainError::Validation(_))
            ));
        }

        let signature = sign_webhook("s3cret", &payload);
        let payment = h
            .services
            .payments
            .handle_webhook(&webhook(&tx, "approved"), &payload, Some(&signature))
            .await
            .unwrap();
        assert!(payment.is_approved());
    }
}

mod payments {
    use super::*;

    #[tokio::test]
    async fn refund_reaches_the_gateway() {
        let h = harness();
        let tx = place(&h, "PIX").await.transaction_id.unwrap();
        let payment = h
            .services
            .payments
            .handle_webhook(&webhook(&tx, "approved"), "{}", None)
            .await
            .unwrap();

        let refunded = h
            .services
            .payments
            .refund(payment.id(), "Customer request")
            .await
            .unwrap();
        assert_eq!(refunded.status(), PaymentStatus::Refunded);
        assert_eq!(h.gateway.query_status(&tx).await.unwrap().status, "refunded");
    }

    #[tokio::test]
    async fn refund_requires_an_approved_payment() {
        let h = harness();
        let receipt = place(&h, "PIX").await;
        let err = h
            .services
            .payments
            .refund(receipt.payment_id, "Too early")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::IllegalOperation(_))
        ));
        assert_eq!(
            h.gateway
                .query_status(receipt.transaction_id.as_deref().unwrap())
                .await
                .unwrap()
                .status,
            "pending"
        );
    }

    #[tokio::test]
    async fn cancel_voids_the_gateway_charge() {
        let h = harness();
        let receipt = place(&h, "PIX").await;
        let canceled = h
            .services
            .payments
            .cancel(receipt.payment_id, "Customer gave up")
            .await
            .unwrap();
        assert_eq!(canceled.status(), PaymentStatus::Canceled);
        assert_eq!(
            h.gateway
                .query_status(receipt.transaction_id.as_deref().unwrap())
                .await
                .unwrap()
                .status,
            "cancelled"
        );
    }

    #[tokio::test]
    async fn cancel_fails_when_the_gateway_is_down() {
        let h = harness();
        let receipt = place(&h, "PIX").await;
        h.gateway.set_unavailable(true).await;

        let err = h
            .services
            .payments
            .cancel(receipt.payment_id, "Customer gave up")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Gateway(_)));
        let payment = h.services.payments.get(receipt.payment_id).await.unwrap();
        assert_eq!(payment.status(), PaymentStatus::Processing);
    }

    #[tokio::test]
    async fn cash_is_approved_at_the_counter() {
        let h = harness();
        let receipt = place(&h, "CASH").await;

        let payment = h
            .services
            .payments
            .approve(receipt.payment_id, None)
            .await
            .unwrap();
        assert!(payment.is_approved());

        let report = h
            .services
            .payments
            .status_by_order(receipt.order_id)
            .await
            .unwrap();
        assert!(report.approved);
        assert_eq!(report.message, "Payment approved");
        assert_eq!(h.services.payments.approved().await.unwrap().len(), 1);
        assert!(h.services.payments.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manual_rejection_records_the_reason() {
        let h = harness();
        let receipt = place(&h, "CREDIT_CARD").await;
        let payment = h
            .services
            .payments
            .reject(receipt.payment_id, "Card declined")
            .await
            .unwrap();
        assert_eq!(payment.status_message(), "Payment rejected: Card declined");
        assert_eq!(
            h.services
                .payments
                .list_by_method("credit_card")
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(h.services.payments.today().await.unwrap().len(), 1);
    }
}
