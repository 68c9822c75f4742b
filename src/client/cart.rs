//! The shopping cart state machine.
//!
//! A cart is an ordered list of line items, unique by product id, where every
//! quantity is at least one. [`Cart`] holds the pure transitions; the free
//! functions load a cart from a [`CartRepository`], apply one transition and
//! save it back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{
    auth::CurrentUser,
    error::{ClientError, ClientResult},
    storage::LocalStorage,
};

/// Storage key holding the cart as a JSON array.
pub const CART_KEY: &str = "cart";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product id.
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bump the quantity of an existing item, or append a new one.
    pub fn add(&mut self, product_id: i64, name: &str, price: Decimal) {
        match self.items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(LineItem {
                id: product_id,
                name: name.to_string(),
                price,
                quantity: 1,
            }),
        }
    }

    /// Overwrite a quantity in place; zero or less removes the item.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product_id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn remove(&mut self, product_id: i64) {
        self.items.retain(|item| item.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Total rendered with two decimal places, e.g. `20.00`.
    pub fn formatted_total(&self) -> String {
        format_amount(self.total())
    }

    /// Number of units across all items, for the cart badge.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Where a cart is loaded from and saved to.
pub trait CartRepository {
    fn load_cart(&self) -> ClientResult<Cart>;
    fn save_cart(&mut self, cart: &Cart) -> ClientResult<()>;
}

impl<T: LocalStorage + ?Sized> CartRepository for T {
    fn load_cart(&self) -> ClientResult<Cart> {
        match self.get_item(CART_KEY) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Cart::new()),
        }
    }

    fn save_cart(&mut self, cart: &Cart) -> ClientResult<()> {
        let raw = serde_json::to_string(cart)?;
        self.set_item(CART_KEY, raw)
    }
}

fn update<R, F>(repo: &mut R, transition: F) -> ClientResult<Cart>
where
    R: CartRepository + ?Sized,
    F: FnOnce(&mut Cart),
{
    let mut cart = repo.load_cart()?;
    transition(&mut cart);
    repo.save_cart(&cart)?;
    Ok(cart)
}

pub fn add_to_cart<R: CartRepository + ?Sized>(
    repo: &mut R,
    product_id: i64,
    name: &str,
    price: Decimal,
) -> ClientResult<Cart> {
    update(repo, |cart| cart.add(product_id, name, price))
}

pub fn update_quantity<R: CartRepository + ?Sized>(
    repo: &mut R,
    product_id: i64,
    quantity: i64,
) -> ClientResult<Cart> {
    update(repo, |cart| cart.set_quantity(product_id, quantity))
}

pub fn remove_from_cart<R: CartRepository + ?Sized>(
    repo: &mut R,
    product_id: i64,
) -> ClientResult<Cart> {
    update(repo, |cart| cart.remove(product_id))
}

pub fn clear_cart<R: CartRepository + ?Sized>(repo: &mut R) -> ClientResult<Cart> {
    update(repo, Cart::clear)
}

/// Simulated order: needs a logged-in user and a non-empty cart, returns the
/// total and empties the cart. Nothing is sent to the server.
pub fn checkout<R: CartRepository + ?Sized>(
    repo: &mut R,
    user: Option<&CurrentUser>,
) -> ClientResult<Decimal> {
    if user.is_none() {
        return Err(ClientError::LoginRequired);
    }
    let mut cart = repo.load_cart()?;
    if cart.is_empty() {
        return Err(ClientError::EmptyCart);
    }
    let total = cart.total();
    cart.clear();
    repo.save_cart(&cart)?;
    Ok(total)
}
