use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Customer, Invoice, InvoiceItem, InvoiceTotals};
use super::errors::{InvoiceError, ValidationErrors};
use super::ports::{CustomerRepository, InvoiceItemRepository, InvoiceRepository};
use super::value_objects::{
  CustomerName, InvoiceNumber, InvoiceStatus, ItemAmount, ItemDescription,
};

/// Customer selection for one submission. A non-empty new-customer name takes
/// precedence over a selected id; the precedence is applied at the HTTP
/// boundary, so by the time a command reaches the service the variant is
/// already decided.
#[derive(Debug, Clone)]
pub enum CustomerRef {
  Existing(Uuid),
  New(String),
}

#[derive(Debug, Clone)]
pub struct ItemFields {
  pub description: String,
  pub quantity: Option<Decimal>,
  pub unit_price: Option<Decimal>,
}

/// One submitted line-item row: inserted, changed, or flagged for removal.
#[derive(Debug, Clone)]
pub enum ItemChange {
  Add(ItemFields),
  Update { id: Uuid, fields: ItemFields },
  Delete { id: Uuid },
}

/// Composite submission for the save workflow. Absent `invoice_id` creates a
/// new invoice; present loads the stored invoice and its items as baseline.
#[derive(Debug, Clone)]
pub struct SaveInvoice {
  pub invoice_id: Option<Uuid>,
  pub customer: Option<CustomerRef>,
  pub invoice_number: Option<String>,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: Option<String>,
  pub notes: Option<String>,
  pub items: Vec<ItemChange>,
}

/// Customer write resolved inside the storage transaction, so a get-or-create
/// rolls back together with everything else.
#[derive(Debug, Clone)]
pub enum CustomerWrite {
  Existing(Uuid),
  GetOrCreate(CustomerName),
}

#[derive(Debug, Clone)]
pub struct ItemWrite {
  pub id: Uuid,
  pub description: ItemDescription,
  pub quantity: Option<ItemAmount>,
  pub unit_price: Option<ItemAmount>,
  pub line_order: i32,
}

/// Fully validated unit of work, committed atomically by the invoice
/// repository: deletions first, then updates, then insertions.
///
/// `invoice_number` is written on insert only; updates never touch it.
#[derive(Debug, Clone)]
pub struct SavePlan {
  pub invoice_id: Uuid,
  pub is_new: bool,
  pub customer: CustomerWrite,
  pub invoice_number: InvoiceNumber,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub notes: Option<String>,
  pub deletes: Vec<Uuid>,
  pub updates: Vec<ItemWrite>,
  pub inserts: Vec<ItemWrite>,
}

pub struct InvoiceService {
  customer_repo: Arc<dyn CustomerRepository>,
  invoice_repo: Arc<dyn InvoiceRepository>,
  item_repo: Arc<dyn InvoiceItemRepository>,
}

impl InvoiceService {
  pub fn new(
    customer_repo: Arc<dyn CustomerRepository>,
    invoice_repo: Arc<dyn InvoiceRepository>,
    item_repo: Arc<dyn InvoiceItemRepository>,
  ) -> Self {
    Self {
      customer_repo,
      invoice_repo,
      item_repo,
    }
  }

  /// Validates the composite submission and commits it as one atomic unit.
  ///
  /// Every check runs before any write and failures are aggregated, so the
  /// caller sees all field- and row-level problems in one response. On any
  /// failure the stored invoice, its items, and the customer table are left
  /// exactly as they were.
  pub async fn save_invoice(&self, command: SaveInvoice) -> Result<Uuid, InvoiceError> {
    // Update mode loads the stored invoice and items as the baseline the
    // row operations are checked against.
    let baseline = match command.invoice_id {
      Some(id) => {
        let invoice = self
          .invoice_repo
          .find_by_id(id)
          .await?
          .ok_or(InvoiceError::InvoiceNotFound(id))?;
        let items = self.item_repo.find_by_invoice_id(id).await?;
        Some((invoice, items))
      }
      None => None,
    };

    let mut errors = ValidationErrors::new();

    let status = match command.status.as_deref() {
      None | Some("") => InvoiceStatus::default(),
      Some(raw) => InvoiceStatus::from_str(raw).unwrap_or_else(|e| {
        errors.push_field("status", e.to_string());
        InvoiceStatus::default()
      }),
    };

    let customer = match &command.customer {
      None => {
        errors.push_field("customer", "Select a customer or enter a new customer name");
        None
      }
      Some(CustomerRef::New(name)) => match CustomerName::new(name.clone()) {
        Ok(name) => Some(CustomerWrite::GetOrCreate(name)),
        Err(e) => {
          errors.push_field("new_customer_name", e.to_string());
          None
        }
      },
      Some(CustomerRef::Existing(id)) => {
        if self.customer_repo.find_by_id(*id).await?.is_none() {
          errors.push_field("customer", format!("Customer {} does not exist", id));
          None
        } else {
          Some(CustomerWrite::Existing(*id))
        }
      }
    };

    // Assigned exactly once, before first persistence; edits keep the
    // stored number no matter what the submission carries.
    let invoice_number = match (&baseline, &command.invoice_number) {
      (Some((invoice, _)), _) => invoice.invoice_number.clone(),
      (None, Some(raw)) => match InvoiceNumber::new(raw.clone()) {
        Ok(number) => number,
        Err(e) => {
          errors.push_field("invoice_number", e.to_string());
          InvoiceNumber::generate()
        }
      },
      (None, None) => InvoiceNumber::generate(),
    };

    let empty_items: Vec<InvoiceItem> = Vec::new();
    let baseline_items: &[InvoiceItem] = baseline
      .as_ref()
      .map(|(_, items)| items.as_slice())
      .unwrap_or(&empty_items);
    let baseline_ids: HashSet<Uuid> = baseline_items.iter().map(|item| item.id).collect();

    let mut deletes: Vec<Uuid> = Vec::new();
    let mut updates: Vec<ItemWrite> = Vec::new();
    let mut adds: Vec<(ItemDescription, Option<ItemAmount>, Option<ItemAmount>)> = Vec::new();

    for (row, change) in command.items.iter().enumerate() {
      match change {
        ItemChange::Delete { id } => {
          if !baseline_ids.contains(id) {
            errors.push_row(row, "id", "Row does not belong to this invoice");
          } else if !deletes.contains(id) {
            deletes.push(*id);
          }
        }
        ItemChange::Add(fields) => {
          if let Some(validated) = validate_item_fields(row, fields, &mut errors) {
            adds.push(validated);
          }
        }
        ItemChange::Update { id, fields } => {
          if !baseline_ids.contains(id) {
            errors.push_row(row, "id", "Row does not belong to this invoice");
            continue;
          }
          if let Some((description, quantity, unit_price)) =
            validate_item_fields(row, fields, &mut errors)
          {
            let line_order = baseline_items
              .iter()
              .find(|item| item.id == *id)
              .map(|item| item.line_order)
              .unwrap_or(0);
            updates.push(ItemWrite {
              id: *id,
              description,
              quantity,
              unit_price,
              line_order,
            });
          }
        }
      }
    }

    // The invariant is checked against the final state: baseline rows minus
    // deletions plus insertions.
    let remaining = baseline_ids.len() - deletes.len() + adds.len();
    if remaining < 1 {
      errors.push_field("items", "An invoice must keep at least one line item");
    }

    if !errors.is_empty() {
      return Err(InvoiceError::Validation(errors));
    }

    let customer = match customer {
      Some(customer) => customer,
      None => {
        let mut errors = ValidationErrors::new();
        errors.push_field("customer", "Select a customer or enter a new customer name");
        return Err(InvoiceError::Validation(errors));
      }
    };

    let invoice_id = command.invoice_id.unwrap_or_else(Uuid::new_v4);

    // New rows are appended after the rows that survive the edit.
    let max_order = baseline_items
      .iter()
      .filter(|item| !deletes.contains(&item.id))
      .map(|item| item.line_order)
      .max()
      .unwrap_or(0);
    let inserts: Vec<ItemWrite> = adds
      .into_iter()
      .enumerate()
      .map(|(i, (description, quantity, unit_price))| ItemWrite {
        id: Uuid::new_v4(),
        description,
        quantity,
        unit_price,
        line_order: max_order + 1 + i as i32,
      })
      .collect();

    let plan = SavePlan {
      invoice_id,
      is_new: baseline.is_none(),
      customer,
      invoice_number,
      issue_date: command.issue_date,
      due_date: command.due_date,
      status,
      notes: command.notes,
      deletes,
      updates,
      inserts,
    };

    self.invoice_repo.save(plan).await
  }

  pub async fn get_invoice_with_details(
    &self,
    invoice_id: Uuid,
  ) -> Result<(Invoice, Customer, Vec<InvoiceItem>, InvoiceTotals), InvoiceError> {
    let invoice = self
      .invoice_repo
      .find_by_id(invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))?;

    let customer = self
      .customer_repo
      .find_by_id(invoice.customer_id)
      .await?
      .ok_or(InvoiceError::CustomerNotFound(invoice.customer_id))?;

    let items = self.item_repo.find_by_invoice_id(invoice_id).await?;
    let totals = InvoiceTotals::calculate(&items);

    Ok((invoice, customer, items, totals))
  }

  pub async fn list_invoices(&self) -> Result<Vec<Invoice>, InvoiceError> {
    self.invoice_repo.find_all_recent().await
  }

  pub async fn create_customer(
    &self,
    name: CustomerName,
    email: Option<String>,
    address: Option<String>,
    phone: Option<String>,
  ) -> Result<Customer, InvoiceError> {
    if self.customer_repo.find_by_name(name.value()).await?.is_some() {
      return Err(InvoiceError::CustomerNameConflict(name.into_inner()));
    }

    let customer = Customer::new(name, email, address, phone);
    self.customer_repo.create(customer).await
  }

  pub async fn list_customers(&self) -> Result<Vec<Customer>, InvoiceError> {
    self.customer_repo.find_all().await
  }
}

fn validate_item_fields(
  row: usize,
  fields: &ItemFields,
  errors: &mut ValidationErrors,
) -> Option<(ItemDescription, Option<ItemAmount>, Option<ItemAmount>)> {
  let mut valid = true;

  let description = match ItemDescription::new(fields.description.clone()) {
    Ok(description) => Some(description),
    Err(e) => {
      errors.push_row(row, "description", e.to_string());
      valid = false;
      None
    }
  };

  let quantity = match fields.quantity.map(ItemAmount::new).transpose() {
    Ok(quantity) => quantity,
    Err(e) => {
      errors.push_row(row, "quantity", e.to_string());
      valid = false;
      None
    }
  };

  let unit_price = match fields.unit_price.map(ItemAmount::new).transpose() {
    Ok(unit_price) => unit_price,
    Err(e) => {
      errors.push_row(row, "unit_price", e.to_string());
      valid = false;
      None
    }
  };

  match (valid, description) {
    (true, Some(description)) => Some((description, quantity, unit_price)),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;
  use std::collections::HashMap;
  use std::sync::Mutex;

  /// In-memory stand-in for the Postgres repositories. `save` stages every
  /// mutation and swaps state only when the whole plan applies, mirroring
  /// the all-or-nothing transaction of the real store.
  #[derive(Default)]
  struct MemoryStore {
    customers: Mutex<HashMap<Uuid, Customer>>,
    invoices: Mutex<HashMap<Uuid, Invoice>>,
    items: Mutex<HashMap<Uuid, InvoiceItem>>,
  }

  #[async_trait]
  impl CustomerRepository for MemoryStore {
    async fn create(&self, customer: Customer) -> Result<Customer, InvoiceError> {
      self
        .customers
        .lock()
        .unwrap()
        .insert(customer.id, customer.clone());
      Ok(customer)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, InvoiceError> {
      Ok(self.customers.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, InvoiceError> {
      Ok(
        self
          .customers
          .lock()
          .unwrap()
          .values()
          .find(|c| c.name.value() == name)
          .cloned(),
      )
    }

    async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
      let mut customers: Vec<Customer> =
        self.customers.lock().unwrap().values().cloned().collect();
      customers.sort_by(|a, b| a.name.value().cmp(b.name.value()));
      Ok(customers)
    }
  }

  #[async_trait]
  impl InvoiceRepository for MemoryStore {
    async fn save(&self, plan: SavePlan) -> Result<Uuid, InvoiceError> {
      let mut customers = self.customers.lock().unwrap();
      let mut invoices = self.invoices.lock().unwrap();
      let mut items = self.items.lock().unwrap();

      let mut staged_customers = customers.clone();
      let mut staged_items = items.clone();

      let customer_id = match &plan.customer {
        CustomerWrite::Existing(id) => {
          if !staged_customers.contains_key(id) {
            return Err(InvoiceError::CustomerNotFound(*id));
          }
          *id
        }
        CustomerWrite::GetOrCreate(name) => {
          let existing_id = staged_customers
            .values()
            .find(|c| c.name.value() == name.value())
            .map(|c| c.id);
          match existing_id {
            Some(id) => id,
            None => {
              let customer = Customer::new(name.clone(), None, None, None);
              let id = customer.id;
              staged_customers.insert(id, customer);
              id
            }
          }
        }
      };

      for id in &plan.deletes {
        staged_items.remove(id);
      }
      for write in plan.updates.iter().chain(plan.inserts.iter()) {
        staged_items.insert(
          write.id,
          InvoiceItem {
            id: write.id,
            invoice_id: plan.invoice_id,
            description: write.description.clone(),
            quantity: write.quantity,
            unit_price: write.unit_price,
            line_order: write.line_order,
          },
        );
      }

      let remaining = staged_items
        .values()
        .filter(|item| item.invoice_id == plan.invoice_id)
        .count();
      if remaining < 1 {
        let mut errors = ValidationErrors::new();
        errors.push_field("items", "An invoice must keep at least one line item");
        return Err(InvoiceError::Validation(errors));
      }

      let invoice = match invoices.get(&plan.invoice_id) {
        Some(existing) if !plan.is_new => {
          let mut updated = existing.clone();
          updated.customer_id = customer_id;
          updated.issue_date = plan.issue_date;
          updated.due_date = plan.due_date;
          updated.status = plan.status;
          updated.notes = plan.notes.clone();
          updated
        }
        _ => Invoice {
          id: plan.invoice_id,
          customer_id,
          invoice_number: plan.invoice_number.clone(),
          issue_date: plan.issue_date,
          due_date: plan.due_date,
          status: plan.status,
          notes: plan.notes.clone(),
          created_at: chrono::Utc::now(),
          updated_at: chrono::Utc::now(),
        },
      };
      invoices.insert(plan.invoice_id, invoice);

      *customers = staged_customers;
      *items = staged_items;

      Ok(plan.invoice_id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
      Ok(self.invoices.lock().unwrap().get(&id).cloned())
    }

    async fn find_all_recent(&self) -> Result<Vec<Invoice>, InvoiceError> {
      let mut invoices: Vec<Invoice> = self.invoices.lock().unwrap().values().cloned().collect();
      invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
      Ok(invoices)
    }
  }

  #[async_trait]
  impl InvoiceItemRepository for MemoryStore {
    async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, InvoiceError> {
      let mut items: Vec<InvoiceItem> = self
        .items
        .lock()
        .unwrap()
        .values()
        .filter(|item| item.invoice_id == invoice_id)
        .cloned()
        .collect();
      items.sort_by_key(|item| item.line_order);
      Ok(items)
    }
  }

  impl MemoryStore {
    /// Lookup helpers; `find_by_id` exists on two of the implemented traits,
    /// so tests read through these instead.
    fn invoice(&self, id: Uuid) -> Invoice {
      self.invoices.lock().unwrap().get(&id).cloned().unwrap()
    }

    fn items_of(&self, invoice_id: Uuid) -> Vec<InvoiceItem> {
      let mut items: Vec<InvoiceItem> = self
        .items
        .lock()
        .unwrap()
        .values()
        .filter(|item| item.invoice_id == invoice_id)
        .cloned()
        .collect();
      items.sort_by_key(|item| item.line_order);
      items
    }

    fn customer_by_name(&self, name: &str) -> Option<Customer> {
      self
        .customers
        .lock()
        .unwrap()
        .values()
        .find(|c| c.name.value() == name)
        .cloned()
    }
  }

  fn service() -> (Arc<MemoryStore>, InvoiceService) {
    let store = Arc::new(MemoryStore::default());
    let service = InvoiceService::new(store.clone(), store.clone(), store.clone());
    (store, service)
  }

  fn add_row(description: &str, quantity: Decimal, unit_price: Decimal) -> ItemChange {
    ItemChange::Add(ItemFields {
      description: description.to_string(),
      quantity: Some(quantity),
      unit_price: Some(unit_price),
    })
  }

  fn save_command(customer: CustomerRef, items: Vec<ItemChange>) -> SaveInvoice {
    SaveInvoice {
      invoice_id: None,
      customer: Some(customer),
      invoice_number: None,
      issue_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
      due_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
      status: None,
      notes: None,
      items,
    }
  }

  #[tokio::test]
  async fn test_create_with_new_customer_and_items() {
    let (store, service) = service();

    let invoice_id = service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![
          add_row("Design", dec!(2), dec!(100.50)),
          add_row("Hosting", dec!(1), dec!(19.99)),
        ],
      ))
      .await
      .unwrap();

    let invoice = store.invoice(invoice_id);
    assert_eq!(invoice.status, InvoiceStatus::Draft);
    assert!(invoice.invoice_number.value().starts_with("INV-"));

    let items = store.items_of(invoice_id);
    assert_eq!(items.len(), 2);
    assert_eq!(InvoiceTotals::calculate(&items).total_amount, dec!(220.99));

    let customer = store.customer_by_name("Acme Corp").unwrap();
    assert_eq!(invoice.customer_id, customer.id);
  }

  #[tokio::test]
  async fn test_new_customer_name_is_get_or_create() {
    let (store, service) = service();

    service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![add_row("First", dec!(1), dec!(10.00))],
      ))
      .await
      .unwrap();
    service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![add_row("Second", dec!(1), dec!(20.00))],
      ))
      .await
      .unwrap();

    assert_eq!(store.customers.lock().unwrap().len(), 1);
    assert_eq!(store.invoices.lock().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_deleting_every_row_is_rejected() {
    let (store, service) = service();

    let invoice_id = service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![
          add_row("Design", dec!(2), dec!(100.00)),
          add_row("Hosting", dec!(1), dec!(19.99)),
        ],
      ))
      .await
      .unwrap();

    let before = store.items_of(invoice_id);
    let mut command = save_command(
      CustomerRef::New("Acme Corp".to_string()),
      before
        .iter()
        .map(|item| ItemChange::Delete { id: item.id })
        .collect(),
    );
    command.invoice_id = Some(invoice_id);

    let result = service.save_invoice(command).await;
    match result {
      Err(InvoiceError::Validation(errors)) => {
        assert!(errors.violations.iter().any(|v| v.field == "items"));
      }
      other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }

    // The stored invoice keeps its prior item set untouched
    let after = store.items_of(invoice_id);
    assert_eq!(after.len(), 2);
    assert_eq!(after, before);
  }

  #[tokio::test]
  async fn test_combined_edit_commits_atomically() {
    let (store, service) = service();

    let invoice_id = service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![
          add_row("Keep me", dec!(1), dec!(50.00)),
          add_row("Drop me", dec!(1), dec!(5.00)),
        ],
      ))
      .await
      .unwrap();

    let before = store.items_of(invoice_id);
    let dropped = before.iter().find(|i| i.description.value() == "Drop me").unwrap();

    let mut command = save_command(
      CustomerRef::New("Acme Corp".to_string()),
      vec![
        ItemChange::Delete { id: dropped.id },
        add_row("Added one", dec!(3), dec!(19.99)),
        add_row("Added two", dec!(1), dec!(0.01)),
      ],
    );
    command.invoice_id = Some(invoice_id);

    service.save_invoice(command).await.unwrap();

    let after = store.items_of(invoice_id);
    let descriptions: Vec<&str> = after.iter().map(|i| i.description.value()).collect();
    assert_eq!(after.len(), 3);
    assert!(descriptions.contains(&"Keep me"));
    assert!(descriptions.contains(&"Added one"));
    assert!(descriptions.contains(&"Added two"));
    assert!(!descriptions.contains(&"Drop me"));
  }

  #[tokio::test]
  async fn test_invoice_number_never_changes_across_edits() {
    let (store, service) = service();

    let invoice_id = service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![add_row("Design", dec!(1), dec!(10.00))],
      ))
      .await
      .unwrap();
    let original_number = store.invoice(invoice_id).invoice_number;

    let mut command = save_command(
      CustomerRef::New("Acme Corp".to_string()),
      vec![add_row("More work", dec!(2), dec!(30.00))],
    );
    command.invoice_id = Some(invoice_id);
    command.status = Some("sent".to_string());
    command.notes = Some("Second pass".to_string());
    // A supplied number on update is ignored
    command.invoice_number = Some("INV-HIJACKED".to_string());

    service.save_invoice(command).await.unwrap();

    let updated = store.invoice(invoice_id);
    assert_eq!(updated.invoice_number, original_number);
    assert_eq!(updated.status, InvoiceStatus::Sent);
    assert_eq!(updated.notes.as_deref(), Some("Second pass"));
  }

  #[tokio::test]
  async fn test_all_validation_failures_reported_together() {
    let (_, service) = service();

    let mut command = save_command(
      CustomerRef::New("Acme Corp".to_string()),
      vec![ItemChange::Add(ItemFields {
        description: "   ".to_string(),
        quantity: Some(dec!(1.999)),
        unit_price: Some(dec!(10.00)),
      })],
    );
    command.customer = None;
    command.status = Some("archived".to_string());

    match service.save_invoice(command).await {
      Err(InvoiceError::Validation(errors)) => {
        let fields: Vec<&str> = errors.violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"customer"));
        assert!(fields.contains(&"status"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"quantity"));
      }
      other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }
  }

  #[tokio::test]
  async fn test_absent_amounts_default_to_zero() {
    let (store, service) = service();

    let invoice_id = service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![ItemChange::Add(ItemFields {
          description: "Placeholder".to_string(),
          quantity: None,
          unit_price: Some(dec!(10.00)),
        })],
      ))
      .await
      .unwrap();

    let items = store.items_of(invoice_id);
    assert_eq!(items[0].line_total(), dec!(0.00));
    assert_eq!(
      InvoiceTotals::calculate(&items).total_amount,
      Decimal::ZERO
    );
  }

  #[tokio::test]
  async fn test_row_for_foreign_invoice_is_rejected() {
    let (_, service) = service();

    let invoice_id = service
      .save_invoice(save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![add_row("Design", dec!(1), dec!(10.00))],
      ))
      .await
      .unwrap();

    let mut command = save_command(
      CustomerRef::New("Acme Corp".to_string()),
      vec![ItemChange::Update {
        id: Uuid::new_v4(),
        fields: ItemFields {
          description: "Phantom".to_string(),
          quantity: Some(dec!(1)),
          unit_price: Some(dec!(1.00)),
        },
      }],
    );
    command.invoice_id = Some(invoice_id);

    match service.save_invoice(command).await {
      Err(InvoiceError::Validation(errors)) => {
        assert!(errors.violations.iter().any(|v| v.row == Some(0) && v.field == "id"));
      }
      other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }
  }

  #[tokio::test]
  async fn test_updating_missing_invoice_is_not_found() {
    let (_, service) = service();

    let missing = Uuid::new_v4();
    let mut command = save_command(
      CustomerRef::New("Acme Corp".to_string()),
      vec![add_row("Design", dec!(1), dec!(10.00))],
    );
    command.invoice_id = Some(missing);

    match service.save_invoice(command).await {
      Err(InvoiceError::InvoiceNotFound(id)) => assert_eq!(id, missing),
      other => panic!("expected not-found, got {:?}", other.map(|_| ())),
    }
  }

  #[tokio::test]
  async fn test_selecting_unknown_customer_is_a_field_error() {
    let (_, service) = service();

    let command = save_command(
      CustomerRef::Existing(Uuid::new_v4()),
      vec![add_row("Design", dec!(1), dec!(10.00))],
    );

    match service.save_invoice(command).await {
      Err(InvoiceError::Validation(errors)) => {
        assert!(errors.violations.iter().any(|v| v.field == "customer"));
      }
      other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }
  }

  #[tokio::test]
  async fn test_create_customer_rejects_duplicate_name() {
    let (_, service) = service();

    service
      .create_customer(
        CustomerName::new("Acme Corp".to_string()).unwrap(),
        Some("billing@acme.test".to_string()),
        None,
        None,
      )
      .await
      .unwrap();

    let result = service
      .create_customer(
        CustomerName::new("Acme Corp".to_string()).unwrap(),
        None,
        None,
        None,
      )
      .await;
    assert!(matches!(result, Err(InvoiceError::CustomerNameConflict(_))));
  }

  #[tokio::test]
  async fn test_listing_orders_by_issue_date_descending() {
    let (_, service) = service();

    for (day, description) in [(1, "oldest"), (20, "newest"), (10, "middle")] {
      let mut command = save_command(
        CustomerRef::New("Acme Corp".to_string()),
        vec![add_row(description, dec!(1), dec!(10.00))],
      );
      command.issue_date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
      service.save_invoice(command).await.unwrap();
    }

    let listed = service.list_invoices().await.unwrap();
    let dates: Vec<NaiveDate> = listed.iter().map(|i| i.issue_date).collect();
    assert_eq!(
      dates,
      vec![
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
      ]
    );
  }
}
