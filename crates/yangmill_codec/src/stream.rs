//! The structural event sink serializers emit to.

use yangmill_foundation::{QName, QNameModule, Result};
use yangmill_model::Value;

/// Sink for binding serialization events.
///
/// Every `start_*` call opens a node and must be balanced by exactly one
/// [`BindingStreamWriter::end_node`]. Leaf events are self-contained.
/// The grammar, per node kind:
///
/// - container, case, list item: `start_* ... end_node`
/// - keyed list: `start_map`, then per entry `start_map_entry ... end_node`,
///   then `end_node`
/// - unkeyed list: `start_unkeyed_list`, then per item
///   `start_unkeyed_list_item ... end_node`, then `end_node`
/// - choice: `start_choice`, one `start_case ... end_node`, `end_node`
/// - augmentation: `start_augmentation ... end_node`
pub trait BindingStreamWriter {
    /// Opens a container node.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_container(&mut self, qname: QName) -> Result<()>;

    /// Opens a keyed list node.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_map(&mut self, qname: QName) -> Result<()>;

    /// Opens one keyed list entry with its key leaf values.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_map_entry(&mut self, qname: QName, key: Vec<(QName, Value)>) -> Result<()>;

    /// Opens an unkeyed list node.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_unkeyed_list(&mut self, qname: QName) -> Result<()>;

    /// Opens one unkeyed list item.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_unkeyed_list_item(&mut self, qname: QName) -> Result<()>;

    /// Opens a choice node.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_choice(&mut self, qname: QName) -> Result<()>;

    /// Opens the active case of the enclosing choice.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_case(&mut self, qname: QName) -> Result<()>;

    /// Opens an augmentation block contributed by `module`.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn start_augmentation(&mut self, module: QNameModule) -> Result<()>;

    /// Emits a leaf value.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn leaf(&mut self, qname: QName, value: Value) -> Result<()>;

    /// Emits a leaf-list with its values in order.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn leaf_list(&mut self, qname: QName, values: Vec<Value>) -> Result<()>;

    /// Closes the most recently opened node.
    ///
    /// # Errors
    /// Implementations report grammar violations and sink failures.
    fn end_node(&mut self) -> Result<()>;
}
