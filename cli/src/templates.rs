/// Invoice used by `quill process` when no file is given.
pub const SAMPLE_INVOICE: &str = "\
INVOICE

Invoice Number: INV-2024-001
Date: January 15, 2024

From:
  Acme Corp
  123 Business Ave, Suite 100
  Springfield, IL 62701

Bill To:
  Widget Industries
  456 Commerce St
  Shelbyville, IL 62565

Description                  Qty    Unit Price    Total
-----------------------------------------------------------
Web Development Services      40      $150.00    $6,000.00
UI/UX Design                  20      $125.00    $2,500.00
Server Hosting (Monthly)       1      $200.00      $200.00

                              Subtotal:          $8,700.00
                              Tax (8%):            $696.00
                              Total:             $9,396.00

Payment Terms: Net 30
Due Date: February 14, 2024
";
